//! Strategies page: list ⇄ create/edit form, with an inline delete
//! confirmation step.
//!
//! Every successful mutation returns to the list and reloads it from the
//! backend. No optimistic update is ever made, so a failure leaves nothing to
//! roll back.

use crate::domain::messages::{self, failure};
use crate::domain::strategy::{StrategyConfig, StrategyDraft};
use crate::ports::trading_api::TradingApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the named strategy. The name is fixed for the life of the form.
    Edit(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    List,
    Form { mode: FormMode, draft: StrategyDraft },
    ConfirmDelete(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategiesPage {
    pub strategies: Vec<StrategyConfig>,
    pub view: View,
    pub error: Option<String>,
    pub enabled_only: bool,
    /// Set once a list load has succeeded; distinguishes "empty" from "failed".
    pub loaded: bool,
}

impl StrategiesPage {
    pub fn new(enabled_only: bool) -> Self {
        Self {
            strategies: Vec::new(),
            view: View::List,
            error: None,
            enabled_only,
            loaded: false,
        }
    }

    pub async fn reload(&mut self, api: &dyn TradingApi) {
        self.error = None;
        self.loaded = false;
        self.ensure_loaded(api).await;
    }

    /// Load the list unless an action already reloaded it. A failed load
    /// never replaces the error an action reported.
    pub async fn ensure_loaded(&mut self, api: &dyn TradingApi) {
        if self.loaded {
            return;
        }
        match api.list_strategies(self.enabled_only).await {
            Ok(list) => {
                self.strategies = list;
                self.loaded = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "loading strategies failed");
                if self.error.is_none() {
                    self.error = Some(failure(messages::LOAD_STRATEGIES, &e));
                }
            }
        }
    }

    /// Query string that keeps the list filter across links and forms.
    pub fn filter_query(&self) -> &'static str {
        if self.enabled_only {
            "?enabled_only=true"
        } else {
            ""
        }
    }

    pub fn open_create(&mut self) {
        self.open_form(FormMode::Create, StrategyDraft::default());
    }

    pub fn open_edit(&mut self, strategy: &StrategyConfig) {
        self.open_form(
            FormMode::Edit(strategy.strategy_name.clone()),
            StrategyDraft::from(strategy),
        );
    }

    /// Open the edit form for a strategy fetched by name.
    pub async fn open_edit_by_name(&mut self, api: &dyn TradingApi, name: &str) {
        match api.get_strategy(name).await {
            Ok(strategy) => self.open_edit(&strategy),
            Err(e) => {
                self.view = View::List;
                self.error = Some(failure(messages::LOAD_STRATEGIES, &e));
            }
        }
    }

    /// Put the page into form state with the given draft, as when a submitted
    /// form is re-rendered.
    pub fn open_form(&mut self, mode: FormMode, mut draft: StrategyDraft) {
        if let FormMode::Edit(name) = &mode {
            draft.strategy_name = name.clone();
        }
        self.view = View::Form { mode, draft };
    }

    pub fn is_editing(&self) -> bool {
        matches!(
            self.view,
            View::Form {
                mode: FormMode::Edit(_),
                ..
            }
        )
    }

    /// Submit the open form. Create or update depends on the form mode.
    ///
    /// An invalid draft keeps the form open and sends nothing. On success the
    /// page returns to the list and reloads. On failure the form stays open
    /// with the operator's input intact.
    pub async fn submit(&mut self, api: &dyn TradingApi) {
        let View::Form { mode, draft } = &self.view else {
            return;
        };

        let action = match mode {
            FormMode::Create => messages::CREATE_STRATEGY,
            FormMode::Edit(_) => messages::UPDATE_STRATEGY,
        };
        let config = match draft.validate() {
            Ok(c) => c,
            Err(e) => {
                self.error = Some(failure(action, &e));
                return;
            }
        };

        let result = match mode {
            FormMode::Create => api.create_strategy(&config).await,
            FormMode::Edit(name) => api.update_strategy(name, &config).await,
        };

        match result {
            Ok(saved) => {
                tracing::info!(strategy = %saved.strategy_name, action, "strategy saved");
                self.view = View::List;
                self.reload(api).await;
            }
            Err(e) => {
                tracing::warn!(strategy = %config.strategy_name, error = %e, action, "saving strategy failed");
                self.error = Some(failure(action, &e));
            }
        }
    }

    pub fn cancel(&mut self) {
        self.view = View::List;
        self.error = None;
    }

    /// First step of a delete: ask for confirmation, send nothing yet.
    pub fn request_delete(&mut self, name: &str) {
        self.view = View::ConfirmDelete(name.to_string());
    }

    /// Second step of a delete. Does nothing unless a confirmation is pending.
    pub async fn confirm_delete(&mut self, api: &dyn TradingApi) {
        let View::ConfirmDelete(name) = &self.view else {
            return;
        };
        let name = name.clone();
        self.view = View::List;

        match api.delete_strategy(&name).await {
            Ok(_) => {
                tracing::info!(strategy = %name, "strategy deleted");
                self.reload(api).await;
            }
            Err(e) => {
                tracing::warn!(strategy = %name, error = %e, "deleting strategy failed");
                self.error = Some(failure(messages::DELETE_STRATEGY, &e));
            }
        }
    }

    pub async fn toggle(&mut self, api: &dyn TradingApi, name: &str) {
        match api.toggle_strategy(name).await {
            Ok(s) => {
                tracing::info!(strategy = %name, enabled = s.enabled, "strategy toggled");
                self.reload(api).await;
            }
            Err(e) => {
                tracing::warn!(strategy = %name, error = %e, "toggling strategy failed");
                self.error = Some(failure(messages::TOGGLE_STRATEGY, &e));
            }
        }
    }

    pub fn enabled_count(&self) -> usize {
        self.strategies.iter().filter(|s| s.enabled).count()
    }

    pub fn is_empty_state(&self) -> bool {
        self.loaded && self.strategies.is_empty()
    }
}
