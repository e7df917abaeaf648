//! Background health polling.
//!
//! The poller owns its task: dropping the [`HealthPoller`] aborts it, so the
//! poll stops exactly when whoever displays it goes away.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::health::HealthMonitor;
use crate::ports::trading_api::TradingApi;

/// Poll once and fold the outcome into a shared monitor. Concurrent callers
/// may finish in any order; only the newest outcome is kept.
pub async fn poll_once(api: &dyn TradingApi, monitor: &RwLock<HealthMonitor>) {
    let ticket = monitor.write().await.begin_poll();
    let outcome = api.health().await;
    monitor.write().await.apply_poll(ticket, outcome);
}

pub struct HealthPoller {
    handle: JoinHandle<()>,
    rx: watch::Receiver<HealthMonitor>,
}

impl HealthPoller {
    /// Start polling immediately, then every `interval`.
    pub fn spawn(api: Arc<dyn TradingApi>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(HealthMonitor::new());
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let outcome = api.health().await;
                tx.send_modify(|monitor| monitor.apply(outcome));
                if tx.is_closed() {
                    break;
                }
            }
        });
        Self { handle, rx }
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthMonitor> {
        self.rx.clone()
    }

    pub fn snapshot(&self) -> HealthMonitor {
        self.rx.borrow().clone()
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
