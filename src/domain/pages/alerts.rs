//! Alerts page: signal history browsing, single-signal detail, and a manual
//! signal form.

use crate::domain::error::DashboardError;
use crate::domain::messages::{self, failure};
use crate::domain::pages::Notice;
use crate::domain::signal::{SignalDraft, SignalHistory, SignalQuery};
use crate::ports::trading_api::TradingApi;

#[derive(Debug, Clone, PartialEq)]
pub struct AlertsPage {
    pub query: SignalQuery,
    pub signals: Vec<SignalHistory>,
    /// Strategy names for the filter and the signal form.
    pub strategy_names: Vec<String>,
    pub draft: SignalDraft,
    pub notice: Option<Notice>,
}

impl AlertsPage {
    pub fn new(query: SignalQuery) -> Self {
        Self {
            query: query.normalized(),
            signals: Vec::new(),
            strategy_names: Vec::new(),
            draft: SignalDraft::default(),
            notice: None,
        }
    }

    pub async fn reload(&mut self, api: &dyn TradingApi) {
        let (signals, strategies) =
            tokio::join!(api.list_signals(&self.query), api.list_strategies(false));

        match signals {
            Ok(s) => self.signals = s,
            Err(e) => {
                tracing::warn!(error = %e, "loading signals failed");
                self.notice = Some(Notice::error(failure(messages::LOAD_SIGNALS, &e)));
            }
        }
        match strategies {
            Ok(list) => {
                self.strategy_names = list.into_iter().map(|s| s.strategy_name).collect();
            }
            // The filter still works as free text without the name list.
            Err(e) => tracing::warn!(error = %e, "loading strategy names failed"),
        }
    }

    /// Send a manual signal, then reload so the new history row shows up.
    pub async fn send(&mut self, api: &dyn TradingApi, draft: SignalDraft) -> bool {
        self.draft = draft;
        let request = match self.draft.validate() {
            Ok(r) => r,
            Err(e) => {
                self.notice = Some(Notice::error(failure(messages::SEND_SIGNAL, &e)));
                return false;
            }
        };

        tracing::info!(strategy = %request.strategy, signal = ?request.signal, "sending manual signal");
        match api.send_signal(&request).await {
            Ok(res) => {
                self.notice = Some(Notice::info(format!("訊號結果：{}", res.summary())));
                self.reload(api).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "manual signal failed");
                self.notice = Some(Notice::error(failure(messages::SEND_SIGNAL, &e)));
                self.reload(api).await;
            }
        }
        true
    }

    pub fn attention_count(&self) -> usize {
        self.signals.iter().filter(|s| s.needs_attention()).count()
    }
}

/// One signal, fetched by id.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDetailPage {
    pub signal: Option<SignalHistory>,
    pub error: Option<String>,
}

impl SignalDetailPage {
    /// A backend 404 means the id does not exist and is returned as an
    /// error. Any other failure is shown on the page.
    pub async fn load(api: &dyn TradingApi, id: i64) -> Result<Self, DashboardError> {
        match api.get_signal(id).await {
            Ok(s) => Ok(Self {
                signal: Some(s),
                error: None,
            }),
            Err(e) if e.status() == Some(404) => Err(e),
            Err(e) => Ok(Self {
                signal: None,
                error: Some(failure(messages::LOAD_SIGNALS, &e)),
            }),
        }
    }
}
