//! Page state behaviour against an in-memory backend.
//!
//! Tests cover:
//! - Strategy create/edit/toggle/delete flows and their failure messages
//! - Health polling keeping the last known status on failure
//! - Order and signal forms blocking invalid input before any request
//! - Dashboard overview and trades filtering

mod common;

use common::*;
use futdash::domain::error::DashboardError;
use futdash::domain::health::HealthMonitor;
use futdash::domain::health_poller::poll_once;
use futdash::domain::order::OrderDraft;
use futdash::domain::pages::alerts::{AlertsPage, SignalDetailPage};
use futdash::domain::pages::dashboard::DashboardOverview;
use futdash::domain::pages::orders::OrdersPage;
use futdash::domain::pages::strategies::{FormMode, StrategiesPage, View};
use futdash::domain::pages::trades::TradesPage;
use futdash::domain::signal::{SignalDraft, SignalQuery};
use futdash::domain::strategy::StrategyDraft;
use tokio::sync::RwLock;

fn named_draft(name: &str) -> StrategyDraft {
    StrategyDraft {
        strategy_name: name.to_string(),
        ..StrategyDraft::default()
    }
}

#[tokio::test]
async fn duplicate_name_keeps_form_open_with_backend_message() {
    let api = MockTradingApi::new().with_strategy(strategy("TXF_vivi_mini", true));
    let mut page = StrategiesPage::new(false);
    page.reload(&api).await;
    page.open_form(FormMode::Create, named_draft("TXF_vivi_mini"));

    page.submit(&api).await;

    assert_eq!(page.error.as_deref(), Some("建立策略失敗：策略名稱已存在"));
    match &page.view {
        View::Form { mode, draft } => {
            assert_eq!(mode, &FormMode::Create);
            assert_eq!(draft.strategy_name, "TXF_vivi_mini");
        }
        other => panic!("expected the form to stay open, got {other:?}"),
    }
    assert_eq!(api.strategy_names(), vec!["TXF_vivi_mini"]);
}

#[tokio::test]
async fn successful_create_returns_to_reloaded_list() {
    let api = MockTradingApi::new();
    let mut page = StrategiesPage::new(false);
    page.reload(&api).await;
    assert!(page.is_empty_state());

    page.open_create();
    page.open_form(FormMode::Create, named_draft("MXF_day"));
    page.submit(&api).await;

    assert_eq!(page.view, View::List);
    assert_eq!(page.error, None);
    assert_eq!(page.strategies.len(), 1);
    assert_eq!(page.strategies[0].strategy_name, "MXF_day");
    assert_eq!(api.count("list_strategies"), 2);
}

#[tokio::test]
async fn invalid_draft_sends_nothing() {
    let api = MockTradingApi::new();
    let mut page = StrategiesPage::new(false);
    let mut draft = named_draft("MXF_day");
    draft.quantity_multiplier = "0".to_string();
    page.open_form(FormMode::Create, draft);

    page.submit(&api).await;

    assert_eq!(api.count("create_strategy"), 0);
    assert!(page.error.as_deref().unwrap().starts_with("表單驗證失敗："));
    assert!(matches!(page.view, View::Form { .. }));
}

#[tokio::test]
async fn edit_updates_under_the_original_name() {
    let api = MockTradingApi::new().with_strategy(strategy("TXF_vivi_mini", true));
    let mut page = StrategiesPage::new(false);
    page.open_edit_by_name(&api, "TXF_vivi_mini").await;
    assert!(page.is_editing());

    let mut draft = named_draft("renamed");
    draft.max_position = "3".to_string();
    page.open_form(FormMode::Edit("TXF_vivi_mini".to_string()), draft);
    page.submit(&api).await;

    assert_eq!(page.view, View::List);
    assert!(api.calls().contains(&"update_strategy:TXF_vivi_mini".to_string()));
    assert_eq!(page.strategies[0].strategy_name, "TXF_vivi_mini");
    assert_eq!(page.strategies[0].max_position, 3);
}

#[tokio::test]
async fn edit_of_missing_strategy_shows_list_with_error() {
    let api = MockTradingApi::new();
    let mut page = StrategiesPage::new(false);
    page.open_edit_by_name(&api, "ghost").await;
    assert_eq!(page.view, View::List);
    assert_eq!(page.error.as_deref(), Some("載入策略失敗：Strategy not found"));
}

#[tokio::test]
async fn update_failure_keeps_input() {
    let api = MockTradingApi::new().with_strategy(strategy("A", true));
    api.fail("update_strategy", Failure::Api(500, "db locked".into()));
    let mut page = StrategiesPage::new(false);
    let mut draft = named_draft("A");
    draft.description = "half typed".to_string();
    page.open_form(FormMode::Edit("A".to_string()), draft);

    page.submit(&api).await;

    assert_eq!(page.error.as_deref(), Some("更新策略失敗：db locked"));
    match &page.view {
        View::Form { draft, .. } => assert_eq!(draft.description, "half typed"),
        other => panic!("expected form, got {other:?}"),
    }
}

#[tokio::test]
async fn toggle_flips_exactly_one_record() {
    let api = MockTradingApi::new()
        .with_strategy(strategy("A", true))
        .with_strategy(strategy("B", true));
    let mut page = StrategiesPage::new(false);
    page.reload(&api).await;
    assert_eq!(page.enabled_count(), 2);

    page.toggle(&api, "A").await;

    assert_eq!(api.count("toggle_strategy"), 1);
    let a = page.strategies.iter().find(|s| s.strategy_name == "A").unwrap();
    let b = page.strategies.iter().find(|s| s.strategy_name == "B").unwrap();
    assert!(!a.enabled);
    assert!(b.enabled);
    assert_eq!(page.enabled_count(), 1);
}

#[tokio::test]
async fn toggle_failure_sets_message() {
    let api = MockTradingApi::new().with_strategy(strategy("A", true));
    api.fail("toggle_strategy", Failure::Unreachable("connection refused".into()));
    let mut page = StrategiesPage::new(false);
    page.reload(&api).await;

    page.toggle(&api, "A").await;

    assert_eq!(
        page.error.as_deref(),
        Some("切換策略狀態失敗：request failed: connection refused")
    );
    assert!(page.strategies[0].enabled);
}

#[tokio::test]
async fn action_then_ensure_loaded_fetches_list_once() {
    let api = MockTradingApi::new().with_strategy(strategy("A", true));
    let mut page = StrategiesPage::new(false);
    page.toggle(&api, "A").await;
    page.ensure_loaded(&api).await;
    assert_eq!(api.count("list_strategies"), 1);
    assert!(!page.strategies[0].enabled);

    api.fail("toggle_strategy", Failure::Api(500, "broker offline".into()));
    let mut page = StrategiesPage::new(false);
    page.toggle(&api, "A").await;
    page.ensure_loaded(&api).await;
    assert_eq!(api.count("list_strategies"), 2);
    assert_eq!(page.strategies.len(), 1);
    assert_eq!(page.error.as_deref(), Some("切換策略狀態失敗：broker offline"));
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let api = MockTradingApi::new()
        .with_strategy(strategy("A", true))
        .with_strategy(strategy("B", false));
    let mut page = StrategiesPage::new(false);
    page.reload(&api).await;

    // Confirming with nothing pending is a no-op.
    page.confirm_delete(&api).await;
    page.request_delete("A");
    assert_eq!(page.view, View::ConfirmDelete("A".to_string()));
    page.cancel();
    assert_eq!(api.count("delete_strategy"), 0);

    page.request_delete("A");
    page.confirm_delete(&api).await;

    assert_eq!(api.count("delete_strategy"), 1);
    assert_eq!(page.view, View::List);
    let names: Vec<_> = page.strategies.iter().map(|s| s.strategy_name.as_str()).collect();
    assert_eq!(names, vec!["B"]);
}

#[tokio::test]
async fn delete_failure_reports_and_keeps_list() {
    let api = MockTradingApi::new().with_strategy(strategy("A", true));
    api.fail("delete_strategy", Failure::Api(409, "strategy has open orders".into()));
    let mut page = StrategiesPage::new(false);
    page.reload(&api).await;

    page.request_delete("A");
    page.confirm_delete(&api).await;

    assert_eq!(page.error.as_deref(), Some("刪除策略失敗：strategy has open orders"));
    assert_eq!(page.strategies.len(), 1);
}

#[tokio::test]
async fn load_failure_is_not_an_empty_state() {
    let api = MockTradingApi::new();
    api.fail("list_strategies", Failure::Unreachable("timed out".into()));
    let mut page = StrategiesPage::new(true);
    page.reload(&api).await;
    assert!(!page.is_empty_state());
    assert_eq!(page.error.as_deref(), Some("載入策略失敗：request failed: timed out"));
}

#[tokio::test]
async fn enabled_only_filters_list() {
    let api = MockTradingApi::new()
        .with_strategy(strategy("A", true))
        .with_strategy(strategy("B", false));
    let mut page = StrategiesPage::new(true);
    page.reload(&api).await;
    assert_eq!(page.strategies.len(), 1);
    assert_eq!(page.strategies[0].strategy_name, "A");
}

#[tokio::test]
async fn health_failure_keeps_last_known_status() {
    let api = MockTradingApi::new();
    let monitor = RwLock::new(HealthMonitor::new());
    assert!(monitor.read().await.is_loading());

    poll_once(&api, &monitor).await;
    {
        let m = monitor.read().await;
        assert!(!m.is_stale());
        assert_eq!(m.last_known().unwrap().unitrade, "connected");
    }

    api.script_health(Err(DashboardError::Http {
        reason: "connection refused".into(),
    }));
    poll_once(&api, &monitor).await;

    let m = monitor.read().await;
    assert!(m.is_stale());
    assert_eq!(m.last_known().unwrap().status, "ok");
    assert_eq!(m.last_error(), Some("request failed: connection refused"));
}

#[tokio::test]
async fn health_recovers_after_failure() {
    let api = MockTradingApi::new();
    let monitor = RwLock::new(HealthMonitor::new());
    api.script_health(Err(DashboardError::Api {
        status: 503,
        detail: "UniTrade offline".into(),
    }));
    poll_once(&api, &monitor).await;
    assert!(monitor.read().await.last_known().is_none());
    assert!(!monitor.read().await.is_loading());

    poll_once(&api, &monitor).await;
    let m = monitor.read().await;
    assert!(!m.is_stale());
    assert_eq!(m.last_error(), None);
    assert!(m.last_success().is_some());
}

#[tokio::test]
async fn order_with_quantity_below_one_never_reaches_backend() {
    let api = MockTradingApi::new();
    let mut page = OrdersPage::new();
    let draft = OrderDraft {
        productid: "TXFF5".to_string(),
        orderqty: "0".to_string(),
        ..OrderDraft::default()
    };

    let sent = page.submit(&api, draft).await;

    assert!(!sent);
    assert_eq!(api.count("place_order"), 0);
    let notice = page.notice.unwrap();
    assert!(notice.is_error);
    assert!(notice.text.starts_with("表單驗證失敗：orderqty"));
}

#[tokio::test]
async fn order_success_shows_result_and_reloads() {
    let api = MockTradingApi::new();
    let mut page = OrdersPage::new();
    let draft = OrderDraft {
        productid: "TXFF5".to_string(),
        price: "21500".to_string(),
        ..OrderDraft::default()
    };

    assert!(page.submit(&api, draft).await);

    let notice = page.notice.clone().unwrap();
    assert!(!notice.is_error);
    assert_eq!(notice.text, "下單結果：submitted");
    assert_eq!(page.orders.len(), 1);
    assert_eq!(page.orders[0].symbol, "TXFF5");
}

#[tokio::test]
async fn order_rejection_uses_backend_detail() {
    let api = MockTradingApi::new();
    api.fail("place_order", Failure::Api(400, "market closed".into()));
    let mut page = OrdersPage::new();
    let draft = OrderDraft {
        productid: "TXFF5".to_string(),
        ..OrderDraft::default()
    };

    assert!(page.submit(&api, draft).await);
    assert_eq!(page.notice.unwrap().text, "下單失敗：market closed");
    assert_eq!(api.count("list_orders"), 0);
}

#[tokio::test]
async fn trades_only_show_filled_orders() {
    let api = MockTradingApi::new()
        .with_order(order_row(1, "submitted", None))
        .with_order(order_row(2, "filled", Some(1)))
        .with_order(order_row(3, "partial_filled", None));
    let page = TradesPage::load(&api).await;
    let ids: Vec<_> = page.fills.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(page.error, None);
}

#[tokio::test]
async fn dashboard_overview_collects_partial_failures() {
    let api = MockTradingApi::new()
        .with_strategy(strategy("A", true))
        .with_strategy(strategy("B", false))
        .with_signal(signal_row(1, "A", "success"));
    let overview = DashboardOverview::load(&api, 10).await;
    assert_eq!(overview.strategy_count, Some(2));
    assert_eq!(overview.enabled_count, Some(1));
    assert_eq!(overview.recent_signals.len(), 1);
    assert!(overview.errors.is_empty());

    api.fail("list_signals", Failure::Unreachable("timed out".into()));
    let overview = DashboardOverview::load(&api, 10).await;
    assert_eq!(overview.strategy_count, Some(2));
    assert_eq!(overview.errors, vec!["載入訊號失敗：request failed: timed out".to_string()]);
}

#[tokio::test]
async fn alerts_filter_and_attention() {
    let api = MockTradingApi::new()
        .with_strategy(strategy("A", true))
        .with_signal(signal_row(1, "A", "success"))
        .with_signal(signal_row(2, "B", "failed"))
        .with_signal(signal_row(3, "A", "ignored"));

    let mut page = AlertsPage::new(SignalQuery::default());
    page.reload(&api).await;
    assert_eq!(page.signals.len(), 3);
    assert_eq!(page.attention_count(), 2);
    assert_eq!(page.strategy_names, vec!["A"]);

    let mut page = AlertsPage::new(SignalQuery {
        strategy: Some("A".into()),
        ..SignalQuery::default()
    });
    page.reload(&api).await;
    assert_eq!(page.signals.len(), 2);
}

#[tokio::test]
async fn manual_signal_to_disabled_strategy_is_reported() {
    let api = MockTradingApi::new().with_strategy(strategy("A", false));
    let mut page = AlertsPage::new(SignalQuery::default());
    let draft = SignalDraft {
        strategy: "A".into(),
        ..SignalDraft::default()
    };

    assert!(page.send(&api, draft).await);

    let notice = page.notice.clone().unwrap();
    assert_eq!(notice.text, "訊號結果：ignored：Strategy is disabled");
    assert_eq!(page.signals.len(), 1);
    assert!(page.signals[0].needs_attention());
}

#[tokio::test]
async fn manual_signal_without_strategy_is_blocked() {
    let api = MockTradingApi::new();
    let mut page = AlertsPage::new(SignalQuery::default());
    assert!(!page.send(&api, SignalDraft::default()).await);
    assert_eq!(api.count("send_signal"), 0);
}

#[tokio::test]
async fn signal_detail_loads_or_reports() {
    let api = MockTradingApi::new().with_signal(signal_row(7, "A", "success"));
    let page = SignalDetailPage::load(&api, 7).await.unwrap();
    assert_eq!(page.signal.unwrap().id, 7);

    let err = SignalDetailPage::load(&api, 8).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.operator_message(), "Signal not found");

    api.fail("get_signal", Failure::Unreachable("connection refused".into()));
    let page = SignalDetailPage::load(&api, 7).await.unwrap();
    assert!(page.signal.is_none());
    assert_eq!(
        page.error.as_deref(),
        Some("載入訊號失敗：request failed: connection refused")
    );
}
