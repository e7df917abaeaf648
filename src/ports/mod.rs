//! Port traits: the seams between dashboard logic and the outside world.

pub mod config_port;
pub mod trading_api;
