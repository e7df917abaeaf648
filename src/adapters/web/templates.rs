//! HTML templates using Askama, and the view-models that feed them.
//!
//! View-models hold display-ready strings so templates stay free of
//! formatting logic.

use askama::Template;

use crate::domain::display::{format_optional_timestamp, format_price, format_timestamp, percent_encode};
use crate::domain::health::HealthMonitor;
use crate::domain::messages;
use crate::domain::navigation::NavLink;
use crate::domain::order::{OrderDraft, OrderRecord};
use crate::domain::order_params::{
    DayTrade, OpenCloseFlag, OrderCondition, OrderType, SelectOption, Side, select_options,
};
use crate::domain::pages::Notice;
use crate::domain::pages::alerts::{AlertsPage, SignalDetailPage};
use crate::domain::pages::dashboard::DashboardOverview;
use crate::domain::pages::orders::OrdersPage;
use crate::domain::pages::strategies::{FormMode, StrategiesPage, View};
use crate::domain::pages::trades::TradesPage;
use crate::domain::signal::{SignalHistory, SignalKind};
use crate::domain::strategy::{StrategyConfig, StrategyDraft};

#[derive(Template)]
#[template(path = "base.html")]
pub struct LayoutTemplate<'a> {
    pub title: &'a str,
    pub brand: &'a str,
    pub nav: Vec<NavLink>,
    pub clock: String,
    pub content: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

// ---------------------------------------------------------------- dashboard

#[derive(Template)]
#[template(path = "health.html")]
pub struct HealthTemplate {
    pub loading: bool,
    pub has_value: bool,
    pub ok: bool,
    pub status: String,
    pub unitrade: String,
    pub backend_error: String,
    pub stale: bool,
    pub poll_error: String,
    pub last_success: String,
}

impl HealthTemplate {
    pub fn from_monitor(monitor: &HealthMonitor) -> Self {
        let known = monitor.last_known();
        Self {
            loading: monitor.is_loading(),
            has_value: known.is_some(),
            ok: known.is_some_and(|h| h.is_ok()),
            status: known.map(|h| h.status.clone()).unwrap_or_default(),
            unitrade: known.map(|h| h.unitrade.clone()).unwrap_or_default(),
            backend_error: known.and_then(|h| h.error.clone()).unwrap_or_default(),
            stale: monitor.is_stale(),
            poll_error: monitor
                .last_error()
                .map(|e| format!("{}失敗：{e}", messages::LOAD_HEALTH))
                .unwrap_or_default(),
            last_success: monitor
                .last_success()
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }
}

pub struct SignalRow {
    pub id: i64,
    pub created_at: String,
    pub strategy_name: String,
    pub kind: String,
    pub signal: String,
    pub actual: String,
    pub status: String,
    pub attention: bool,
    pub detail: String,
}

impl From<&SignalHistory> for SignalRow {
    fn from(s: &SignalHistory) -> Self {
        let signal = format!(
            "{} × {} @ {}",
            s.signal_product.as_deref().unwrap_or("-"),
            s.signal_quantity.map_or("-".to_string(), |q| q.to_string()),
            format_price(s.signal_price),
        );
        let actual = match (&s.actual_product, s.actual_quantity, &s.actual_bs) {
            (Some(p), Some(q), Some(bs)) => format!("{p} {bs} {q}口"),
            _ => "-".to_string(),
        };
        let detail = s
            .error_message
            .clone()
            .or_else(|| s.order_id.clone())
            .unwrap_or_default();
        Self {
            id: s.id,
            created_at: format_timestamp(&s.created_at),
            strategy_name: s.strategy_name.clone(),
            kind: s.kind_label(),
            signal,
            actual,
            status: s.status.clone(),
            attention: s.needs_attention(),
            detail,
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub health_html: String,
    pub poll_secs: u64,
    pub strategy_count: String,
    pub enabled_count: String,
    pub signals: Vec<SignalRow>,
    pub errors: Vec<String>,
}

impl DashboardTemplate {
    pub fn new(overview: &DashboardOverview, health_html: String, poll_secs: u64) -> Self {
        let count = |c: Option<usize>| c.map_or("-".to_string(), |n| n.to_string());
        Self {
            health_html,
            poll_secs,
            strategy_count: count(overview.strategy_count),
            enabled_count: count(overview.enabled_count),
            signals: overview.recent_signals.iter().map(SignalRow::from).collect(),
            errors: overview.errors.clone(),
        }
    }
}

// --------------------------------------------------------------- strategies

pub struct StrategyCard {
    pub name: String,
    pub path: String,
    pub enabled: bool,
    pub mapping: String,
    pub multiplier: i64,
    pub max_position: i64,
    pub entry: String,
    pub exit: String,
    pub day_trade: bool,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&StrategyConfig> for StrategyCard {
    fn from(s: &StrategyConfig) -> Self {
        Self {
            name: s.strategy_name.clone(),
            path: format!("/strategies/{}", percent_encode(&s.strategy_name)),
            enabled: s.enabled,
            mapping: s.mapping(),
            multiplier: s.quantity_multiplier,
            max_position: s.max_position,
            entry: s.entry_summary(),
            exit: s.exit_summary(),
            day_trade: s.is_day_trade(),
            description: s.description.clone().unwrap_or_default(),
            created_at: format_optional_timestamp(s.created_at.as_deref()),
            updated_at: format_optional_timestamp(s.updated_at.as_deref()),
        }
    }
}

pub struct StrategyFormView {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    pub editing: bool,
    pub draft: StrategyDraft,
    pub order_type: Vec<SelectOption>,
    pub order_condition: Vec<SelectOption>,
    pub entry_order_type: Vec<SelectOption>,
    pub entry_order_condition: Vec<SelectOption>,
    pub exit_order_type: Vec<SelectOption>,
    pub exit_order_condition: Vec<SelectOption>,
    pub dtrade: Vec<SelectOption>,
}

impl StrategyFormView {
    fn new(mode: &FormMode, draft: &StrategyDraft, filter_query: &str) -> Self {
        let (heading, submit_label, action, editing) = match mode {
            FormMode::Create => (
                "建立策略",
                "建立",
                format!("/strategies{filter_query}"),
                false,
            ),
            FormMode::Edit(name) => (
                "編輯策略",
                "更新",
                format!("/strategies/{}/edit{filter_query}", percent_encode(name)),
                true,
            ),
        };
        Self {
            heading,
            submit_label,
            action,
            editing,
            draft: draft.clone(),
            order_type: select_options::<OrderType>(&draft.order_type),
            order_condition: select_options::<OrderCondition>(&draft.order_condition),
            entry_order_type: select_options::<OrderType>(&draft.entry_order_type),
            entry_order_condition: select_options::<OrderCondition>(&draft.entry_order_condition),
            exit_order_type: select_options::<OrderType>(&draft.exit_order_type),
            exit_order_condition: select_options::<OrderCondition>(&draft.exit_order_condition),
            dtrade: select_options::<DayTrade>(&draft.dtrade),
        }
    }
}

pub struct ConfirmDeleteView {
    pub name: String,
    pub path: String,
}

#[derive(Template)]
#[template(path = "strategies.html")]
pub struct StrategiesTemplate {
    pub cards: Vec<StrategyCard>,
    pub form: Option<StrategyFormView>,
    pub confirm: Option<ConfirmDeleteView>,
    pub error: String,
    pub empty: bool,
    pub enabled_only: bool,
    pub enabled_count: usize,
    /// Appended to every strategy link so actions keep the list filter.
    pub filter_query: &'static str,
}

impl StrategiesTemplate {
    pub fn from_page(page: &StrategiesPage) -> Self {
        let filter_query = page.filter_query();
        let (form, confirm) = match &page.view {
            View::List => (None, None),
            View::Form { mode, draft } => {
                (Some(StrategyFormView::new(mode, draft, filter_query)), None)
            }
            View::ConfirmDelete(name) => (
                None,
                Some(ConfirmDeleteView {
                    name: name.clone(),
                    path: format!("/strategies/{}/delete{filter_query}", percent_encode(name)),
                }),
            ),
        };
        Self {
            cards: page.strategies.iter().map(StrategyCard::from).collect(),
            form,
            confirm,
            error: page.error.clone().unwrap_or_default(),
            empty: page.is_empty_state(),
            enabled_only: page.enabled_only,
            enabled_count: page.enabled_count(),
            filter_query,
        }
    }
}

// ------------------------------------------------------------------- orders

pub struct OrderRow {
    pub created_at: String,
    pub symbol: String,
    pub action: String,
    pub quantity: i64,
    pub price: String,
    pub source: String,
    pub status: String,
    pub reference: String,
    pub error: String,
    pub fill: String,
}

impl From<&OrderRecord> for OrderRow {
    fn from(o: &OrderRecord) -> Self {
        let fill = match (o.fill_quantity, o.fill_price) {
            (Some(q), Some(p)) => format!("{q} @ {}", format_price(Some(p))),
            (Some(q), None) => q.to_string(),
            _ => o.fill_status.clone().unwrap_or_default(),
        };
        Self {
            created_at: format_optional_timestamp(o.created_at.as_deref()),
            symbol: o.symbol.clone(),
            action: o.action.clone(),
            quantity: o.quantity,
            price: format_price(o.price),
            source: o.source.clone().unwrap_or_default(),
            status: o.status.clone(),
            reference: o.reference().to_string(),
            error: o.error_message.clone().unwrap_or_default(),
            fill,
        }
    }
}

pub struct NoticeView {
    pub text: String,
    pub is_error: bool,
}

impl From<&Notice> for NoticeView {
    fn from(n: &Notice) -> Self {
        Self {
            text: n.text.clone(),
            is_error: n.is_error,
        }
    }
}

#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub draft: OrderDraft,
    pub bs: Vec<SelectOption>,
    pub ordertype: Vec<SelectOption>,
    pub ordercondition: Vec<SelectOption>,
    pub opencloseflag: Vec<SelectOption>,
    pub dtrade: Vec<SelectOption>,
    pub notice: Option<NoticeView>,
    pub orders: Vec<OrderRow>,
}

impl OrdersTemplate {
    pub fn from_page(page: &OrdersPage) -> Self {
        let d = &page.draft;
        Self {
            bs: select_options::<Side>(&d.bs),
            ordertype: select_options::<OrderType>(&d.ordertype),
            ordercondition: select_options::<OrderCondition>(&d.ordercondition),
            opencloseflag: select_options::<OpenCloseFlag>(&d.opencloseflag),
            dtrade: select_options::<DayTrade>(&d.dtrade),
            draft: d.clone(),
            notice: page.notice.as_ref().map(NoticeView::from),
            orders: page.orders.iter().map(OrderRow::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "trades.html")]
pub struct TradesTemplate {
    pub fills: Vec<OrderRow>,
    pub error: String,
}

impl TradesTemplate {
    pub fn from_page(page: &TradesPage) -> Self {
        Self {
            fills: page.fills.iter().map(OrderRow::from).collect(),
            error: page.error.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "positions.html")]
pub struct PositionsTemplate {
    pub notice: &'static str,
}

impl Default for PositionsTemplate {
    fn default() -> Self {
        Self {
            notice: "部位查詢尚未開放，請至券商系統確認未平倉部位。",
        }
    }
}

// ------------------------------------------------------------------- alerts

pub struct StrategyNameOption {
    pub name: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "alerts.html")]
pub struct AlertsTemplate {
    pub signals: Vec<SignalRow>,
    pub attention_count: usize,
    pub filter_strategy: String,
    pub limit: u32,
    pub filter_options: Vec<StrategyNameOption>,
    pub form_options: Vec<StrategyNameOption>,
    pub kinds: Vec<SelectOption>,
    pub draft_quantity: String,
    pub draft_price: String,
    pub draft_product: String,
    pub draft_note: String,
    pub notice: Option<NoticeView>,
    pub previous_link: String,
    pub next_link: String,
}

impl AlertsTemplate {
    pub fn from_page(page: &AlertsPage) -> Self {
        let filter = page.query.strategy.clone().unwrap_or_default();
        let names = |current: &str| {
            page.strategy_names
                .iter()
                .map(|n| StrategyNameOption {
                    name: n.clone(),
                    selected: n == current,
                })
                .collect::<Vec<_>>()
        };
        let link = |q: Option<crate::domain::signal::SignalQuery>| {
            q.map(|q| format!("/alerts?{}", q.to_query_string()))
                .unwrap_or_default()
        };
        Self {
            signals: page.signals.iter().map(SignalRow::from).collect(),
            attention_count: page.attention_count(),
            filter_options: names(&filter),
            form_options: names(&page.draft.strategy),
            filter_strategy: filter,
            limit: page.query.limit,
            kinds: select_options::<SignalKind>(&page.draft.signal),
            draft_quantity: page.draft.quantity.clone(),
            draft_price: page.draft.price.clone(),
            draft_product: page.draft.product.clone(),
            draft_note: page.draft.note.clone(),
            notice: page.notice.as_ref().map(NoticeView::from),
            previous_link: link(page.query.previous()),
            next_link: link(page.query.next(page.signals.len())),
        }
    }
}

pub struct SignalField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Template)]
#[template(path = "signal_detail.html")]
pub struct SignalDetailTemplate {
    pub id: String,
    pub fields: Vec<SignalField>,
    pub payload: String,
    pub error: String,
}

impl SignalDetailTemplate {
    pub fn from_page(page: &SignalDetailPage) -> Self {
        let Some(s) = &page.signal else {
            return Self {
                id: String::new(),
                fields: Vec::new(),
                payload: String::new(),
                error: page.error.clone().unwrap_or_default(),
            };
        };
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        let num = |v: Option<i64>| v.map_or("-".to_string(), |n| n.to_string());
        let fields = vec![
            SignalField { label: "時間", value: format_timestamp(&s.created_at) },
            SignalField { label: "策略", value: s.strategy_name.clone() },
            SignalField { label: "訊號", value: s.kind_label() },
            SignalField { label: "訊號商品", value: opt(&s.signal_product) },
            SignalField { label: "訊號數量", value: num(s.signal_quantity) },
            SignalField { label: "訊號價格", value: format_price(s.signal_price) },
            SignalField { label: "備註", value: opt(&s.signal_note) },
            SignalField { label: "實際商品", value: opt(&s.actual_product) },
            SignalField { label: "實際口數", value: num(s.actual_quantity) },
            SignalField { label: "買賣別", value: opt(&s.actual_bs) },
            SignalField { label: "狀態", value: s.status.clone() },
            SignalField { label: "委託編號", value: opt(&s.order_id) },
            SignalField { label: "錯誤訊息", value: opt(&s.error_message) },
        ];
        Self {
            id: s.id.to_string(),
            fields,
            payload: s.pretty_payload(),
            error: String::new(),
        }
    }
}
