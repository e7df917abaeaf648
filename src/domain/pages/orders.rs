//! Orders page: one manual order form and the order history list.

use crate::domain::messages::{self, failure};
use crate::domain::order::{OrderDraft, OrderRecord};
use crate::domain::pages::Notice;
use crate::ports::trading_api::TradingApi;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrdersPage {
    pub orders: Vec<OrderRecord>,
    pub draft: OrderDraft,
    pub notice: Option<Notice>,
}

impl OrdersPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reload(&mut self, api: &dyn TradingApi) {
        match api.list_orders().await {
            Ok(orders) => self.orders = orders,
            Err(e) => {
                tracing::warn!(error = %e, "loading orders failed");
                self.notice = Some(Notice::error(failure(messages::LOAD_ORDERS, &e)));
            }
        }
    }

    /// Validate and submit. Returns whether a request was actually issued.
    ///
    /// Invalid input is reported on the form and never reaches the backend.
    /// The list is reloaded only after a successful submit.
    pub async fn submit(&mut self, api: &dyn TradingApi, draft: OrderDraft) -> bool {
        self.draft = draft;
        let request = match self.draft.validate() {
            Ok(r) => r,
            Err(e) => {
                self.notice = Some(Notice::error(failure(messages::PLACE_ORDER, &e)));
                return false;
            }
        };

        tracing::info!(
            product = %request.productid,
            qty = request.orderqty,
            side = ?request.bs,
            "submitting manual order"
        );
        match api.place_order(&request).await {
            Ok(res) => {
                let status = if res.status.is_empty() { "ok" } else { res.status.as_str() };
                self.notice = Some(Notice::info(format!("下單結果：{status}")));
                self.reload(api).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "manual order failed");
                self.notice = Some(Notice::error(failure(messages::PLACE_ORDER, &e)));
            }
        }
        true
    }
}
