#![allow(dead_code)]

use async_trait::async_trait;
use futdash::domain::error::DashboardError;
use futdash::domain::health::HealthStatus;
use futdash::domain::order::{OrderRecord, OrderRequest, OrderResponse};
use futdash::domain::order_params::Choice;
use futdash::domain::signal::{SignalHistory, SignalQuery, SignalRequest, SignalResponse};
use futdash::domain::strategy::{StrategyConfig, StrategyDraft};
use futdash::ports::trading_api::{DeleteAck, TradingApi};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// How an injected failure surfaces.
#[derive(Debug, Clone)]
pub enum Failure {
    Api(u16, String),
    Unreachable(String),
}

impl Failure {
    fn to_error(&self) -> DashboardError {
        match self {
            Failure::Api(status, detail) => DashboardError::Api {
                status: *status,
                detail: detail.clone(),
            },
            Failure::Unreachable(reason) => DashboardError::Http {
                reason: reason.clone(),
            },
        }
    }
}

/// In-memory backend that behaves like the real one for the calls the
/// dashboard makes, and records every call.
pub struct MockTradingApi {
    strategies: Mutex<Vec<StrategyConfig>>,
    orders: Mutex<Vec<OrderRecord>>,
    signals: Mutex<Vec<SignalHistory>>,
    health_script: Mutex<VecDeque<Result<HealthStatus, DashboardError>>>,
    failures: Mutex<HashMap<&'static str, Failure>>,
    calls: Mutex<Vec<String>>,
}

impl MockTradingApi {
    pub fn new() -> Self {
        Self {
            strategies: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            signals: Mutex::new(Vec::new()),
            health_script: Mutex::new(VecDeque::new()),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_strategy(self, strategy: StrategyConfig) -> Self {
        self.strategies.lock().unwrap().push(strategy);
        self
    }

    pub fn with_order(self, order: OrderRecord) -> Self {
        self.orders.lock().unwrap().push(order);
        self
    }

    pub fn with_signal(self, signal: SignalHistory) -> Self {
        self.signals.lock().unwrap().push(signal);
        self
    }

    /// Make every call to `method` fail until cleared.
    pub fn fail(&self, method: &'static str, failure: Failure) {
        self.failures.lock().unwrap().insert(method, failure);
    }

    pub fn clear_failure(&self, method: &'static str) {
        self.failures.lock().unwrap().remove(method);
    }

    /// Queue the next health outcomes. Once drained, health reports ok.
    pub fn script_health(&self, outcome: Result<HealthStatus, DashboardError>) {
        self.health_script.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls to `method`, ignoring arguments.
    pub fn count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(':').next() == Some(method))
            .count()
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.strategy_name.clone())
            .collect()
    }

    fn enter(&self, method: &'static str, arg: &str) -> Result<(), DashboardError> {
        let entry = if arg.is_empty() {
            method.to_string()
        } else {
            format!("{method}:{arg}")
        };
        self.calls.lock().unwrap().push(entry);
        match self.failures.lock().unwrap().get(method) {
            Some(f) => Err(f.to_error()),
            None => Ok(()),
        }
    }
}

fn not_found(what: &str) -> DashboardError {
    DashboardError::Api {
        status: 404,
        detail: format!("{what} not found"),
    }
}

#[async_trait]
impl TradingApi for MockTradingApi {
    async fn health(&self) -> Result<HealthStatus, DashboardError> {
        self.enter("health", "")?;
        match self.health_script.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Ok(healthy()),
        }
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, DashboardError> {
        self.enter("list_orders", "")?;
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResponse, DashboardError> {
        self.enter("place_order", &order.productid)?;
        let mut orders = self.orders.lock().unwrap();
        let id = orders.len() as i64 + 1;
        orders.push(OrderRecord {
            id,
            symbol: order.productid.clone(),
            action: order.bs.code().to_string(),
            quantity: order.orderqty,
            price: Some(order.price),
            strategy: order.strategy.clone(),
            order_type: Some(order.ordertype.code().to_string()),
            order_condition: Some(order.ordercondition.code().to_string()),
            source: Some("manual".to_string()),
            status: "submitted".to_string(),
            order_id: Some(format!("ORD{id:04}")),
            order_result: None,
            error_message: None,
            created_at: Some("2025-01-02T09:30:00".to_string()),
            fill_status: None,
            fill_quantity: None,
            fill_price: None,
            updated_at: None,
        });
        Ok(OrderResponse {
            status: "submitted".to_string(),
            order_id: Some(format!("ORD{id:04}")),
            result: None,
        })
    }

    async fn list_strategies(
        &self,
        enabled_only: bool,
    ) -> Result<Vec<StrategyConfig>, DashboardError> {
        self.enter("list_strategies", "")?;
        Ok(self
            .strategies
            .lock()
            .unwrap()
            .iter()
            .filter(|s| !enabled_only || s.enabled)
            .cloned()
            .collect())
    }

    async fn get_strategy(&self, name: &str) -> Result<StrategyConfig, DashboardError> {
        self.enter("get_strategy", name)?;
        self.strategies
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.strategy_name == name)
            .cloned()
            .ok_or_else(|| not_found("Strategy"))
    }

    async fn create_strategy(
        &self,
        config: &StrategyConfig,
    ) -> Result<StrategyConfig, DashboardError> {
        self.enter("create_strategy", &config.strategy_name)?;
        let mut strategies = self.strategies.lock().unwrap();
        if strategies
            .iter()
            .any(|s| s.strategy_name == config.strategy_name)
        {
            return Err(DashboardError::Api {
                status: 400,
                detail: "策略名稱已存在".to_string(),
            });
        }
        let mut saved = config.clone();
        saved.id = Some(strategies.len() as i64 + 1);
        saved.created_at = Some("2025-01-02T09:30:00".to_string());
        strategies.push(saved.clone());
        Ok(saved)
    }

    async fn update_strategy(
        &self,
        name: &str,
        config: &StrategyConfig,
    ) -> Result<StrategyConfig, DashboardError> {
        self.enter("update_strategy", name)?;
        let mut strategies = self.strategies.lock().unwrap();
        let existing = strategies
            .iter_mut()
            .find(|s| s.strategy_name == name)
            .ok_or_else(|| not_found("Strategy"))?;
        let id = existing.id;
        *existing = config.clone();
        existing.id = id;
        existing.strategy_name = name.to_string();
        Ok(existing.clone())
    }

    async fn delete_strategy(&self, name: &str) -> Result<DeleteAck, DashboardError> {
        self.enter("delete_strategy", name)?;
        let mut strategies = self.strategies.lock().unwrap();
        let before = strategies.len();
        strategies.retain(|s| s.strategy_name != name);
        if strategies.len() == before {
            return Err(not_found("Strategy"));
        }
        Ok(DeleteAck {
            status: "success".to_string(),
            message: Some(format!("Strategy {name} deleted")),
        })
    }

    async fn toggle_strategy(&self, name: &str) -> Result<StrategyConfig, DashboardError> {
        self.enter("toggle_strategy", name)?;
        let mut strategies = self.strategies.lock().unwrap();
        let s = strategies
            .iter_mut()
            .find(|s| s.strategy_name == name)
            .ok_or_else(|| not_found("Strategy"))?;
        s.enabled = !s.enabled;
        Ok(s.clone())
    }

    async fn list_signals(
        &self,
        query: &SignalQuery,
    ) -> Result<Vec<SignalHistory>, DashboardError> {
        self.enter("list_signals", "")?;
        Ok(self
            .signals
            .lock()
            .unwrap()
            .iter()
            .filter(|s| query.strategy.as_ref().is_none_or(|n| &s.strategy_name == n))
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn get_signal(&self, id: i64) -> Result<SignalHistory, DashboardError> {
        self.enter("get_signal", &id.to_string())?;
        self.signals
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| not_found("Signal"))
    }

    async fn send_signal(&self, signal: &SignalRequest) -> Result<SignalResponse, DashboardError> {
        self.enter("send_signal", &signal.strategy)?;
        let enabled = self
            .strategies
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.strategy_name == signal.strategy)
            .map(|s| s.enabled);
        let (status, message) = match enabled {
            Some(true) => ("success", None),
            Some(false) => ("ignored", Some("Strategy is disabled")),
            None => ("failed", Some("Strategy not found")),
        };
        let mut signals = self.signals.lock().unwrap();
        let id = signals.len() as i64 + 1;
        let mut row = signal_row(id, &signal.strategy, status);
        row.error_message = message.map(str::to_string);
        signals.insert(0, row);
        Ok(SignalResponse {
            status: status.to_string(),
            signal_id: Some(id),
            order_id: None,
            message: message.map(str::to_string),
            actual_product: None,
            actual_quantity: None,
        })
    }
}

pub fn healthy() -> HealthStatus {
    HealthStatus {
        status: "ok".to_string(),
        unitrade: "connected".to_string(),
        error: None,
    }
}

pub fn strategy(name: &str, enabled: bool) -> StrategyConfig {
    StrategyDraft {
        strategy_name: name.to_string(),
        enabled,
        ..StrategyDraft::default()
    }
    .validate()
    .unwrap()
}

pub fn signal_row(id: i64, strategy: &str, status: &str) -> SignalHistory {
    SignalHistory {
        id,
        strategy_name: strategy.to_string(),
        signal_type: "long_entry".to_string(),
        signal_product: Some("TXFF5".to_string()),
        signal_quantity: Some(1),
        signal_price: Some(21500.0),
        signal_note: None,
        actual_product: Some("TXFF5".to_string()),
        actual_quantity: Some(1),
        actual_bs: Some("B".to_string()),
        status: status.to_string(),
        order_id: None,
        error_message: None,
        raw_payload: Some(serde_json::json!({"strategy": strategy, "signal": "long_entry"})),
        created_at: "2025-01-02T09:30:00".to_string(),
    }
}

pub fn order_row(id: i64, status: &str, fill_quantity: Option<i64>) -> OrderRecord {
    OrderRecord {
        id,
        symbol: "TXFF5".to_string(),
        action: "B".to_string(),
        quantity: 1,
        price: Some(21500.0),
        strategy: None,
        order_type: Some("L".to_string()),
        order_condition: Some("R".to_string()),
        source: Some("signal".to_string()),
        status: status.to_string(),
        order_id: Some(format!("ORD{id:04}")),
        order_result: None,
        error_message: None,
        created_at: Some("2025-01-02T09:30:00".to_string()),
        fill_status: None,
        fill_quantity,
        fill_price: fill_quantity.map(|_| 21500.0),
        updated_at: None,
    }
}
