//! HTTP request handlers for web adapter.
//!
//! Each handler builds a page, lets it talk to the backend, and renders it.
//! Backend failures surface inside the page, so most handlers only fail on
//! template errors.

use std::sync::Arc;

use axum::{
    Form,
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Redirect, Response},
};
use serde::Deserialize;

use crate::domain::display::percent_encode;
use crate::domain::health_poller::poll_once;
use crate::domain::navigation::NOT_FOUND_TITLE;
use crate::domain::order::OrderDraft;
use crate::domain::pages::alerts::{AlertsPage, SignalDetailPage};
use crate::domain::pages::dashboard::DashboardOverview;
use crate::domain::pages::orders::OrdersPage;
use crate::domain::pages::strategies::{FormMode, StrategiesPage, View};
use crate::domain::pages::trades::TradesPage;
use crate::domain::signal::{SignalDraft, SignalQuery};
use crate::domain::strategy::StrategyDraft;

use super::templates::{
    AlertsTemplate, DashboardTemplate, ErrorTemplate, HealthTemplate, OrdersTemplate,
    PositionsTemplate, SignalDetailTemplate, StrategiesTemplate, TradesTemplate,
};
use super::{AppState, WebError, clock_now, page, render};

type AppStateRef = State<Arc<AppState>>;

pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

pub async fn clock() -> String {
    clock_now()
}

// ---------------------------------------------------------------- dashboard

async fn render_health(state: &AppState) -> Result<String, WebError> {
    poll_once(state.api.as_ref(), &state.health).await;
    let monitor = state.health.read().await;
    render(&HealthTemplate::from_monitor(&monitor))
}

pub async fn dashboard(
    State(state): AppStateRef,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let (overview, health_html) = tokio::join!(
        DashboardOverview::load(state.api.as_ref(), state.settings.recent_signals),
        render_health(&state),
    );
    let template =
        DashboardTemplate::new(&overview, health_html?, state.settings.health_poll.as_secs());
    page(&headers, "/dashboard", render(&template)?)
}

/// Polled by the dashboard's health panel.
pub async fn health(State(state): AppStateRef) -> Result<Html<String>, WebError> {
    Ok(Html(render_health(&state).await?))
}

// --------------------------------------------------------------- strategies

#[derive(Debug, Default, Deserialize)]
pub struct StrategyFilter {
    #[serde(default)]
    pub enabled_only: bool,
}

fn strategies_page(headers: &HeaderMap, page_state: &StrategiesPage) -> Result<Response, WebError> {
    let path = match &page_state.view {
        View::Form {
            mode: FormMode::Create,
            ..
        } => "/strategies/new".to_string(),
        View::Form {
            mode: FormMode::Edit(name),
            ..
        } => format!("/strategies/{}/edit", percent_encode(name)),
        View::ConfirmDelete(name) => {
            format!("/strategies/{}/delete", percent_encode(name))
        }
        View::List => "/strategies".to_string(),
    };
    page(
        headers,
        &format!("{path}{}", page_state.filter_query()),
        render(&StrategiesTemplate::from_page(page_state))?,
    )
}

pub async fn strategies(
    State(state): AppStateRef,
    headers: HeaderMap,
    Query(filter): Query<StrategyFilter>,
) -> Result<Response, WebError> {
    let mut p = StrategiesPage::new(filter.enabled_only);
    p.reload(state.api.as_ref()).await;
    strategies_page(&headers, &p)
}

pub async fn new_strategy(
    State(state): AppStateRef,
    headers: HeaderMap,
    Query(filter): Query<StrategyFilter>,
) -> Result<Response, WebError> {
    let mut p = StrategiesPage::new(filter.enabled_only);
    p.open_create();
    p.ensure_loaded(state.api.as_ref()).await;
    strategies_page(&headers, &p)
}

pub async fn create_strategy(
    State(state): AppStateRef,
    headers: HeaderMap,
    Query(filter): Query<StrategyFilter>,
    Form(draft): Form<StrategyDraft>,
) -> Result<Response, WebError> {
    let api = state.api.as_ref();
    let mut p = StrategiesPage::new(filter.enabled_only);
    p.open_form(FormMode::Create, draft);
    p.submit(api).await;
    p.ensure_loaded(api).await;
    strategies_page(&headers, &p)
}

pub async fn edit_strategy(
    State(state): AppStateRef,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(filter): Query<StrategyFilter>,
) -> Result<Response, WebError> {
    let api = state.api.as_ref();
    let mut p = StrategiesPage::new(filter.enabled_only);
    p.open_edit_by_name(api, &name).await;
    p.ensure_loaded(api).await;
    strategies_page(&headers, &p)
}

pub async fn update_strategy(
    State(state): AppStateRef,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(filter): Query<StrategyFilter>,
    Form(draft): Form<StrategyDraft>,
) -> Result<Response, WebError> {
    let api = state.api.as_ref();
    let mut p = StrategiesPage::new(filter.enabled_only);
    p.open_form(FormMode::Edit(name), draft);
    p.submit(api).await;
    p.ensure_loaded(api).await;
    strategies_page(&headers, &p)
}

pub async fn confirm_delete_strategy(
    State(state): AppStateRef,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(filter): Query<StrategyFilter>,
) -> Result<Response, WebError> {
    let mut p = StrategiesPage::new(filter.enabled_only);
    p.request_delete(&name);
    p.ensure_loaded(state.api.as_ref()).await;
    strategies_page(&headers, &p)
}

pub async fn delete_strategy(
    State(state): AppStateRef,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(filter): Query<StrategyFilter>,
) -> Result<Response, WebError> {
    let api = state.api.as_ref();
    let mut p = StrategiesPage::new(filter.enabled_only);
    p.request_delete(&name);
    p.confirm_delete(api).await;
    p.ensure_loaded(api).await;
    strategies_page(&headers, &p)
}

pub async fn toggle_strategy(
    State(state): AppStateRef,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(filter): Query<StrategyFilter>,
) -> Result<Response, WebError> {
    let api = state.api.as_ref();
    let mut p = StrategiesPage::new(filter.enabled_only);
    p.toggle(api, &name).await;
    p.ensure_loaded(api).await;
    strategies_page(&headers, &p)
}

// ------------------------------------------------------------ orders/trades

pub async fn orders(State(state): AppStateRef, headers: HeaderMap) -> Result<Response, WebError> {
    let mut p = OrdersPage::new();
    p.reload(state.api.as_ref()).await;
    page(&headers, "/orders", render(&OrdersTemplate::from_page(&p))?)
}

pub async fn place_order(
    State(state): AppStateRef,
    headers: HeaderMap,
    Form(draft): Form<OrderDraft>,
) -> Result<Response, WebError> {
    let api = state.api.as_ref();
    let mut p = OrdersPage::new();
    p.reload(api).await;
    p.submit(api, draft).await;
    page(&headers, "/orders", render(&OrdersTemplate::from_page(&p))?)
}

pub async fn trades(State(state): AppStateRef, headers: HeaderMap) -> Result<Response, WebError> {
    let p = TradesPage::load(state.api.as_ref()).await;
    page(&headers, "/trades", render(&TradesTemplate::from_page(&p))?)
}

pub async fn positions(headers: HeaderMap) -> Result<Response, WebError> {
    page(&headers, "/positions", render(&PositionsTemplate::default())?)
}

// ------------------------------------------------------------------- alerts

pub async fn alerts(
    State(state): AppStateRef,
    headers: HeaderMap,
    Query(query): Query<SignalQuery>,
) -> Result<Response, WebError> {
    let mut p = AlertsPage::new(query);
    p.reload(state.api.as_ref()).await;
    let path = format!("/alerts?{}", p.query.to_query_string());
    page(&headers, &path, render(&AlertsTemplate::from_page(&p))?)
}

pub async fn send_signal(
    State(state): AppStateRef,
    headers: HeaderMap,
    Form(draft): Form<SignalDraft>,
) -> Result<Response, WebError> {
    let api = state.api.as_ref();
    let mut p = AlertsPage::new(SignalQuery::default());
    if !p.send(api, draft).await {
        p.reload(api).await;
    }
    page(&headers, "/alerts", render(&AlertsTemplate::from_page(&p))?)
}

pub async fn signal_detail(
    State(state): AppStateRef,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id: i64 = id
        .parse()
        .map_err(|_| WebError::not_found(format!("訊號編號無效：{id}")))?;
    let p = SignalDetailPage::load(state.api.as_ref(), id).await?;
    page(
        &headers,
        &format!("/alerts/{id}"),
        render(&SignalDetailTemplate::from_page(&p))?,
    )
}

pub async fn not_found(
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, WebError> {
    let message = format!("{NOT_FOUND_TITLE}：{}", uri.path());
    let content = render(&ErrorTemplate {
        message: &message,
        status: StatusCode::NOT_FOUND.as_u16(),
    })?;
    let mut response = page(&headers, uri.path(), content)?;
    *response.status_mut() = StatusCode::NOT_FOUND;
    Ok(response)
}
