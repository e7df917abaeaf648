//! Page state for each dashboard screen.
//!
//! A page is built per request, loads from the backend, applies at most one
//! operator action, and is then rendered. Nothing survives between requests;
//! the backend is the only source of truth.

pub mod alerts;
pub mod dashboard;
pub mod orders;
pub mod strategies;
pub mod trades;

/// A one-line message shown above a page's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}
