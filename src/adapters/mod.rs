//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod http_api;
#[cfg(feature = "web")]
pub mod web;
