//! Trades page: the orders that have fill information.

use crate::domain::messages::{self, failure};
use crate::domain::order::OrderRecord;
use crate::ports::trading_api::TradingApi;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradesPage {
    pub fills: Vec<OrderRecord>,
    pub error: Option<String>,
}

impl TradesPage {
    pub async fn load(api: &dyn TradingApi) -> Self {
        match api.list_orders().await {
            Ok(orders) => Self {
                fills: orders.into_iter().filter(OrderRecord::has_fill).collect(),
                error: None,
            },
            Err(e) => Self {
                fills: Vec::new(),
                error: Some(failure(messages::LOAD_ORDERS, &e)),
            },
        }
    }
}
