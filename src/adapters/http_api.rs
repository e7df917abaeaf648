//! REST client for the trading backend.
//!
//! Every request target is resolved against one base URL. Absolute URLs pass
//! through untouched, and anything else is appended to the base's path.
//! Failures are classified as transport errors (`Http`), backend rejections
//! (`Api`, carrying FastAPI's `detail`) or bodies that do not decode
//! (`Decode`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::domain::error::DashboardError;
use crate::domain::health::HealthStatus;
use crate::domain::order::{OrderRecord, OrderRequest, OrderResponse};
use crate::domain::settings::Settings;
use crate::domain::signal::{SignalHistory, SignalQuery, SignalRequest, SignalResponse};
use crate::domain::strategy::StrategyConfig;
use crate::ports::trading_api::{DeleteAck, TradingApi};

#[derive(Debug, Clone)]
pub struct HttpTradingApi {
    client: Client,
    base: Url,
}

impl HttpTradingApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        let base = Url::parse(base_url).map_err(|e| DashboardError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(DashboardError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Http {
                reason: e.to_string(),
            })?;
        Ok(Self { client, base })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, DashboardError> {
        Self::new(&settings.api_base_url, settings.api_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a request target the way every call does: absolute
    /// `http(s)://` targets pass through, paths are joined under the base.
    pub fn resolve(&self, target: &str) -> Result<Url, DashboardError> {
        if target.starts_with("http://") || target.starts_with("https://") {
            return Url::parse(target).map_err(|e| DashboardError::InvalidUrl {
                url: target.to_string(),
                reason: e.to_string(),
            });
        }
        let segments: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();
        self.endpoint(&segments)
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DashboardError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::InvalidUrl {
                url: self.base.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, DashboardError> {
        let request = request.build().map_err(|e| DashboardError::Http {
            reason: e.to_string(),
        })?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "backend request");

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "backend unreachable");
            DashboardError::Http {
                reason: e.to_string(),
            }
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| DashboardError::Http {
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            let detail = error_detail(status, &body);
            tracing::warn!(%method, %url, status = status.as_u16(), %detail, "backend rejected request");
            return Err(DashboardError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|e| DashboardError::Decode {
            reason: format!("{method} {}: {e}", url.path()),
        })
    }
}

/// Pull a human-readable reason out of an error body.
///
/// FastAPI sends `{"detail": "..."}` for handled errors and
/// `{"detail": [{"msg": ...}, ...]}` for request validation failures.
pub fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl TradingApi for HttpTradingApi {
    async fn health(&self) -> Result<HealthStatus, DashboardError> {
        let url = self.endpoint(&["health"])?;
        self.execute(self.client.get(url)).await
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, DashboardError> {
        let url = self.endpoint(&["orders"])?;
        self.execute(self.client.get(url)).await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResponse, DashboardError> {
        let url = self.endpoint(&["order"])?;
        self.execute(self.client.post(url).json(order)).await
    }

    async fn list_strategies(
        &self,
        enabled_only: bool,
    ) -> Result<Vec<StrategyConfig>, DashboardError> {
        let url = self.endpoint(&["strategies"])?;
        let mut request = self.client.get(url);
        if enabled_only {
            request = request.query(&[("enabled_only", "true")]);
        }
        self.execute(request).await
    }

    async fn get_strategy(&self, name: &str) -> Result<StrategyConfig, DashboardError> {
        let url = self.endpoint(&["strategies", name])?;
        self.execute(self.client.get(url)).await
    }

    async fn create_strategy(
        &self,
        config: &StrategyConfig,
    ) -> Result<StrategyConfig, DashboardError> {
        let url = self.endpoint(&["strategies"])?;
        self.execute(self.client.post(url).json(config)).await
    }

    async fn update_strategy(
        &self,
        name: &str,
        config: &StrategyConfig,
    ) -> Result<StrategyConfig, DashboardError> {
        let url = self.endpoint(&["strategies", name])?;
        self.execute(self.client.put(url).json(config)).await
    }

    async fn delete_strategy(&self, name: &str) -> Result<DeleteAck, DashboardError> {
        let url = self.endpoint(&["strategies", name])?;
        self.execute(self.client.delete(url)).await
    }

    async fn toggle_strategy(&self, name: &str) -> Result<StrategyConfig, DashboardError> {
        let url = self.endpoint(&["strategies", name, "toggle"])?;
        self.execute(self.client.patch(url).json(&serde_json::json!({})))
            .await
    }

    async fn list_signals(
        &self,
        query: &SignalQuery,
    ) -> Result<Vec<SignalHistory>, DashboardError> {
        let url = self.endpoint(&["signals"])?;
        self.execute(self.client.get(url).query(query)).await
    }

    async fn get_signal(&self, id: i64) -> Result<SignalHistory, DashboardError> {
        let id = id.to_string();
        let url = self.endpoint(&["signals", &id])?;
        self.execute(self.client.get(url)).await
    }

    async fn send_signal(&self, signal: &SignalRequest) -> Result<SignalResponse, DashboardError> {
        let url = self.endpoint(&["signal"])?;
        self.execute(self.client.post(url).json(signal)).await
    }
}
