//! Backend health: the last-known status and how polling updates it.
//!
//! A failed poll never clears what the operator is looking at. It marks the
//! shown value stale and records why.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::error::DashboardError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub unitrade: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthMonitor {
    last_known: Option<HealthStatus>,
    stale: bool,
    last_error: Option<String>,
    last_success: Option<DateTime<Local>>,
    /// Ticket handed to the most recently started poll.
    issued: u64,
    /// Ticket of the newest poll whose outcome was recorded.
    applied: u64,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, status: HealthStatus, at: DateTime<Local>) {
        self.last_known = Some(status);
        self.stale = false;
        self.last_error = None;
        self.last_success = Some(at);
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.stale = true;
        self.last_error = Some(error.into());
    }

    /// Fold one poll outcome into the monitor.
    pub fn apply(&mut self, outcome: Result<HealthStatus, DashboardError>) {
        match outcome {
            Ok(status) => self.record_success(status, Local::now()),
            Err(err) => {
                tracing::warn!(error = %err, "health poll failed; keeping last known status");
                self.record_failure(err.operator_message());
            }
        }
    }

    /// Reserve a ticket for a poll that is about to start.
    pub fn begin_poll(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Fold in the outcome of the poll holding `ticket`. Polls can finish out
    /// of order; an outcome older than one already recorded is dropped.
    pub fn apply_poll(
        &mut self,
        ticket: u64,
        outcome: Result<HealthStatus, DashboardError>,
    ) -> bool {
        if ticket < self.applied {
            tracing::debug!(ticket, newest = self.applied, "dropping out-of-order health poll");
            return false;
        }
        self.applied = ticket;
        self.apply(outcome);
        true
    }

    pub fn last_known(&self) -> Option<&HealthStatus> {
        self.last_known.as_ref()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_success(&self) -> Option<DateTime<Local>> {
        self.last_success
    }

    /// True until the first poll completes either way.
    pub fn is_loading(&self) -> bool {
        self.last_known.is_none() && self.last_error.is_none()
    }
}
