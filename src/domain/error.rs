//! Domain error types.

/// Top-level error type for futdash.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("request failed: {reason}")]
    Http { reason: String },

    #[error("HTTP {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("unexpected response body: {reason}")]
    Decode { reason: String },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Backend status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The part of the error an operator should read: the backend's `detail`
    /// for API rejections, the full message otherwise.
    pub fn operator_message(&self) -> String {
        match self {
            Self::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) => 1,
            DashboardError::ConfigParse { .. }
            | DashboardError::ConfigInvalid { .. }
            | DashboardError::InvalidUrl { .. } => 2,
            DashboardError::Http { .. }
            | DashboardError::Api { .. }
            | DashboardError::Decode { .. } => 3,
            DashboardError::Validation { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
