//! Operator-facing message text (zh-TW).

use crate::domain::error::DashboardError;

pub const LOAD_STRATEGIES: &str = "載入策略";
pub const CREATE_STRATEGY: &str = "建立策略";
pub const UPDATE_STRATEGY: &str = "更新策略";
pub const DELETE_STRATEGY: &str = "刪除策略";
pub const TOGGLE_STRATEGY: &str = "切換策略狀態";
pub const LOAD_ORDERS: &str = "載入訂單";
pub const PLACE_ORDER: &str = "下單";
pub const LOAD_SIGNALS: &str = "載入訊號";
pub const SEND_SIGNAL: &str = "送出訊號";
pub const LOAD_HEALTH: &str = "載入系統狀態";

/// `{action}失敗：{reason}`. Validation errors read as a form problem, not a
/// failed action, because no request was made.
pub fn failure(action: &str, err: &DashboardError) -> String {
    match err {
        DashboardError::Validation { .. } => format!("表單驗證失敗：{err}"),
        other => format!("{action}失敗：{}", other.operator_message()),
    }
}
