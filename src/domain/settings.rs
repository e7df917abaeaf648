//! Typed runtime settings, read from a [`ConfigPort`] with defaults applied.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::error::DashboardError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const API_URL_ENV: &str = "FUTDASH_API_BASE_URL";

/// Base URL baked in at compile time, if the build set one.
pub const BUILD_API_URL: Option<&str> = option_env!("FUTDASH_API_URL");

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub listen: SocketAddr,
    pub health_poll: Duration,
    pub recent_signals: u32,
    pub log_filter: String,
}

/// Pick the backend base URL.
///
/// A runtime override wins over the config file, which wins over the
/// build-time value; the default applies when nothing is set.
pub fn resolve_base_url(
    runtime_override: Option<&str>,
    configured: Option<&str>,
    build_time: Option<&str>,
) -> String {
    [runtime_override, configured, build_time]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

impl Settings {
    pub fn from_config(
        config: &dyn ConfigPort,
        api_url_override: Option<&str>,
    ) -> Result<Self, DashboardError> {
        let api_base_url = resolve_base_url(
            api_url_override,
            config.get_string("api", "base_url").as_deref(),
            BUILD_API_URL,
        );

        let timeout_secs = at_least_one(config, "api", "timeout_secs", 10)?;
        let poll_secs = at_least_one(config, "dashboard", "health_poll_secs", 5)?;
        let recent_signals = at_least_one(config, "dashboard", "recent_signals", 10)?;

        let listen_raw = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen = listen_raw
            .parse()
            .map_err(|_| DashboardError::ConfigInvalid {
                section: "web".to_string(),
                key: "listen".to_string(),
                reason: format!("'{listen_raw}' is not a socket address"),
            })?;

        Ok(Self {
            api_base_url,
            api_timeout: Duration::from_secs(timeout_secs),
            listen,
            health_poll: Duration::from_secs(poll_secs),
            recent_signals: u32::try_from(recent_signals).unwrap_or(u32::MAX),
            log_filter: config
                .get_string("log", "filter")
                .unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// A whole number of at least one; `default` when the key is absent.
fn at_least_one(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u64,
) -> Result<u64, DashboardError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    let invalid = |reason: String| DashboardError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    };
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{raw}' is not a whole number")))?;
    if value < 1 {
        return Err(invalid(format!("must be at least 1, got {value}")));
    }
    Ok(value)
}
