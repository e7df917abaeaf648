//! Dashboard page: strategy counts and recent signals, fetched once on entry.
//! Health is polled separately; see [`crate::domain::health`].

use crate::domain::messages::{self, failure};
use crate::domain::signal::{SignalHistory, SignalQuery};
use crate::ports::trading_api::TradingApi;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardOverview {
    pub strategy_count: Option<usize>,
    pub enabled_count: Option<usize>,
    pub recent_signals: Vec<SignalHistory>,
    pub errors: Vec<String>,
}

impl DashboardOverview {
    pub async fn load(api: &dyn TradingApi, recent_limit: u32) -> Self {
        let query = SignalQuery::recent(recent_limit).normalized();
        let (strategies, signals) =
            tokio::join!(api.list_strategies(false), api.list_signals(&query));

        let mut overview = Self::default();
        match strategies {
            Ok(list) => {
                overview.strategy_count = Some(list.len());
                overview.enabled_count = Some(list.iter().filter(|s| s.enabled).count());
            }
            Err(e) => overview.errors.push(failure(messages::LOAD_STRATEGIES, &e)),
        }
        match signals {
            Ok(list) => overview.recent_signals = list,
            Err(e) => overview.errors.push(failure(messages::LOAD_SIGNALS, &e)),
        }
        overview
    }
}
