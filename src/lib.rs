//! futdash — operator dashboard for a futures auto-trading backend.
//!
//! Hexagonal architecture: domain logic and page state in [`domain`], port
//! traits in [`ports`], the REST client, config reader and web server in
//! [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
