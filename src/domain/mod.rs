//! Core domain types, page state and display logic.

pub mod display;
pub mod error;
pub mod health;
pub mod health_poller;
pub mod messages;
pub mod navigation;
pub mod order;
pub mod order_params;
pub mod pages;
pub mod settings;
pub mod signal;
pub mod strategy;
