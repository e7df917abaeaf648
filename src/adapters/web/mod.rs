//! Web server adapter.
//!
//! Server-rendered pages with an HTMX front end. A full page is the layout
//! with the page fragment inside `#content`; HTMX requests that target
//! `#content` get the fragment alone. Boosted navigation gets the full page
//! so the nav highlight follows.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use std::sync::Arc;

use askama::Template;
use axum::{
    Router,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::domain::error::DashboardError;
use crate::domain::health::HealthMonitor;
use crate::domain::navigation::{BRAND, nav_links, page_title};
use crate::domain::settings::Settings;
use crate::ports::trading_api::TradingApi;

pub struct AppState {
    pub api: Arc<dyn TradingApi>,
    /// Shared across requests so a failed poll keeps the last known status.
    pub health: Arc<RwLock<HealthMonitor>>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(api: Arc<dyn TradingApi>, settings: Settings) -> Self {
        Self {
            api,
            health: Arc::new(RwLock::new(HealthMonitor::new())),
            settings,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/clock", get(handlers::clock))
        .route("/dashboard", get(handlers::dashboard))
        .route("/dashboard/health", get(handlers::health))
        .route(
            "/strategies",
            get(handlers::strategies).post(handlers::create_strategy),
        )
        .route("/strategies/new", get(handlers::new_strategy))
        .route(
            "/strategies/{name}/edit",
            get(handlers::edit_strategy).post(handlers::update_strategy),
        )
        .route(
            "/strategies/{name}/delete",
            get(handlers::confirm_delete_strategy).post(handlers::delete_strategy),
        )
        .route("/strategies/{name}/toggle", post(handlers::toggle_strategy))
        .route("/orders", get(handlers::orders).post(handlers::place_order))
        .route("/positions", get(handlers::positions))
        .route("/trades", get(handlers::trades))
        .route("/alerts", get(handlers::alerts))
        .route("/alerts/signal", post(handlers::send_signal))
        .route("/alerts/{id}", get(handlers::signal_detail))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(state: AppState) -> Result<(), DashboardError> {
    let listen = state.settings.listen;
    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(%listen, backend = %state.settings.api_base_url, "dashboard listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// A fragment request: HTMX, but not boosted navigation.
fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.contains_key("HX-Request") && !headers.contains_key("HX-Boosted")
}

fn clock_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn render<T: Template>(template: &T) -> Result<String, WebError> {
    template
        .render()
        .map_err(|e| WebError::internal(format!("template error: {e}")))
}

/// Wrap a rendered fragment for the requester. `path` is the page the
/// content belongs to; it picks the title and nav highlight and is pushed
/// into the browser history on fragment swaps.
fn page(headers: &HeaderMap, path: &str, content: String) -> Result<Response, WebError> {
    if is_htmx_request(headers) {
        return Ok(([("HX-Push-Url", path.to_string())], Html(content)).into_response());
    }
    let layout = LayoutTemplate {
        title: page_title(path),
        brand: BRAND,
        nav: nav_links(path),
        clock: clock_now(),
        content: &content,
    };
    Ok(Html(render(&layout)?).into_response())
}
