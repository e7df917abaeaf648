//! Trading backend port: one method per REST endpoint.
//!
//! Implementations do not retry and do not cache. Every call reaches the
//! backend, and callers decide what a failure means for their page.

use async_trait::async_trait;

use crate::domain::error::DashboardError;
use crate::domain::health::HealthStatus;
use crate::domain::order::{OrderRecord, OrderRequest, OrderResponse};
use crate::domain::signal::{SignalHistory, SignalQuery, SignalRequest, SignalResponse};
use crate::domain::strategy::StrategyConfig;

/// Acknowledgement body of `DELETE /strategies/{name}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[async_trait]
pub trait TradingApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, DashboardError>;

    /// `GET /orders`
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, DashboardError>;

    /// `POST /order`
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResponse, DashboardError>;

    /// `GET /strategies`, optionally only enabled ones.
    async fn list_strategies(&self, enabled_only: bool)
    -> Result<Vec<StrategyConfig>, DashboardError>;

    /// `GET /strategies/{name}`
    async fn get_strategy(&self, name: &str) -> Result<StrategyConfig, DashboardError>;

    /// `POST /strategies`. The backend rejects duplicate names.
    async fn create_strategy(
        &self,
        config: &StrategyConfig,
    ) -> Result<StrategyConfig, DashboardError>;

    /// `PUT /strategies/{name}`. The name itself cannot change.
    async fn update_strategy(
        &self,
        name: &str,
        config: &StrategyConfig,
    ) -> Result<StrategyConfig, DashboardError>;

    /// `DELETE /strategies/{name}`
    async fn delete_strategy(&self, name: &str) -> Result<DeleteAck, DashboardError>;

    /// `PATCH /strategies/{name}/toggle`, returning the record after the flip.
    async fn toggle_strategy(&self, name: &str) -> Result<StrategyConfig, DashboardError>;

    /// `GET /signals`, newest first.
    async fn list_signals(&self, query: &SignalQuery)
    -> Result<Vec<SignalHistory>, DashboardError>;

    /// `GET /signals/{id}`
    async fn get_signal(&self, id: i64) -> Result<SignalHistory, DashboardError>;

    /// `POST /signal`
    async fn send_signal(&self, signal: &SignalRequest) -> Result<SignalResponse, DashboardError>;
}
