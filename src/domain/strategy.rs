//! Strategy configuration: how an inbound signal's product maps to an
//! outbound order, with quantity scaling and order-parameter presets.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::DashboardError;
use crate::domain::order_params::{Choice, DayTrade, OrderCondition, OrderType};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_PRODUCT_LEN: usize = 20;
pub const MAX_SUB_ACCOUNT_LEN: usize = 10;

/// A strategy as the backend stores it. `strategy_name` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub strategy_name: String,
    pub source_product: String,
    pub target_product: String,
    pub quantity_multiplier: i64,
    pub max_position: i64,
    /// Legacy single-leg defaults, superseded by the entry/exit pairs but
    /// still required by the backend schema.
    pub order_type: OrderType,
    pub order_condition: OrderCondition,
    pub dtrade: DayTrade,
    pub entry_order_type: OrderType,
    pub entry_order_condition: OrderCondition,
    pub exit_order_type: OrderType,
    pub exit_order_condition: OrderCondition,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub sub_account: String,
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl StrategyConfig {
    pub fn mapping(&self) -> String {
        format!("{} → {}", self.source_product, self.target_product)
    }

    pub fn entry_summary(&self) -> String {
        format!(
            "{} / {}",
            self.entry_order_type.label(),
            self.entry_order_condition.label()
        )
    }

    pub fn exit_summary(&self) -> String {
        format!(
            "{} / {}",
            self.exit_order_type.label(),
            self.exit_order_condition.label()
        )
    }

    pub fn is_day_trade(&self) -> bool {
        self.dtrade == DayTrade::Yes
    }
}

/// Form state for creating or editing a strategy.
///
/// Numeric inputs stay as text so a half-typed value can be re-rendered with
/// an error instead of being rejected by the form extractor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrategyDraft {
    #[serde(default)]
    pub strategy_name: String,
    #[serde(default)]
    pub description: String,
    pub source_product: String,
    pub target_product: String,
    pub quantity_multiplier: String,
    #[serde(default)]
    pub max_position: String,
    #[serde(default = "default_order_type")]
    pub order_type: String,
    #[serde(default = "default_order_condition")]
    pub order_condition: String,
    pub entry_order_type: String,
    pub entry_order_condition: String,
    pub exit_order_type: String,
    pub exit_order_condition: String,
    pub dtrade: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub sub_account: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub enabled: bool,
}

fn default_order_type() -> String {
    OrderType::Limit.code().to_string()
}

fn default_order_condition() -> String {
    OrderCondition::Rod.code().to_string()
}

/// HTML checkboxes are either absent or carry an arbitrary value.
fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.is_some())
}

impl Default for StrategyDraft {
    fn default() -> Self {
        Self {
            strategy_name: String::new(),
            description: String::new(),
            source_product: "TXFF5".into(),
            target_product: "TXFF5".into(),
            quantity_multiplier: "1".into(),
            max_position: "10".into(),
            order_type: OrderType::Limit.code().into(),
            order_condition: OrderCondition::Rod.code().into(),
            entry_order_type: OrderType::Limit.code().into(),
            entry_order_condition: OrderCondition::Rod.code().into(),
            exit_order_type: OrderType::Market.code().into(),
            exit_order_condition: OrderCondition::Ioc.code().into(),
            dtrade: DayTrade::No.code().into(),
            account: String::new(),
            sub_account: String::new(),
            enabled: true,
        }
    }
}

impl From<&StrategyConfig> for StrategyDraft {
    fn from(cfg: &StrategyConfig) -> Self {
        Self {
            strategy_name: cfg.strategy_name.clone(),
            description: cfg.description.clone().unwrap_or_default(),
            source_product: cfg.source_product.clone(),
            target_product: cfg.target_product.clone(),
            quantity_multiplier: cfg.quantity_multiplier.to_string(),
            max_position: cfg.max_position.to_string(),
            order_type: cfg.order_type.code().into(),
            order_condition: cfg.order_condition.code().into(),
            entry_order_type: cfg.entry_order_type.code().into(),
            entry_order_condition: cfg.entry_order_condition.code().into(),
            exit_order_type: cfg.exit_order_type.code().into(),
            exit_order_condition: cfg.exit_order_condition.code().into(),
            dtrade: cfg.dtrade.code().into(),
            account: cfg.account.clone().unwrap_or_default(),
            sub_account: cfg.sub_account.clone(),
            enabled: cfg.enabled,
        }
    }
}

impl StrategyDraft {
    /// Check required fields and convert to the wire shape.
    ///
    /// Only form-level rules live here; uniqueness and everything else is
    /// decided by the backend.
    pub fn validate(&self) -> Result<StrategyConfig, DashboardError> {
        let strategy_name = required("strategy_name", &self.strategy_name, MAX_NAME_LEN)?;
        let source_product = required("source_product", &self.source_product, MAX_PRODUCT_LEN)?;
        let target_product = required("target_product", &self.target_product, MAX_PRODUCT_LEN)?;
        let quantity_multiplier = positive("quantity_multiplier", &self.quantity_multiplier)?;
        let max_position = positive("max_position", &self.max_position)?;

        let sub_account = self.sub_account.trim().to_string();
        if sub_account.chars().count() > MAX_SUB_ACCOUNT_LEN {
            return Err(DashboardError::validation(
                "sub_account",
                format!("at most {MAX_SUB_ACCOUNT_LEN} characters"),
            ));
        }

        Ok(StrategyConfig {
            id: None,
            strategy_name,
            source_product,
            target_product,
            quantity_multiplier,
            max_position,
            order_type: OrderType::parse("order_type", &self.order_type)?,
            order_condition: OrderCondition::parse("order_condition", &self.order_condition)?,
            dtrade: DayTrade::parse("dtrade", &self.dtrade)?,
            entry_order_type: OrderType::parse("entry_order_type", &self.entry_order_type)?,
            entry_order_condition: OrderCondition::parse(
                "entry_order_condition",
                &self.entry_order_condition,
            )?,
            exit_order_type: OrderType::parse("exit_order_type", &self.exit_order_type)?,
            exit_order_condition: OrderCondition::parse(
                "exit_order_condition",
                &self.exit_order_condition,
            )?,
            account: non_blank(&self.account),
            sub_account,
            enabled: self.enabled,
            description: non_blank(&self.description),
            created_at: None,
            updated_at: None,
        })
    }
}

fn required(field: &str, value: &str, max_len: usize) -> Result<String, DashboardError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DashboardError::validation(field, "required"));
    }
    if value.chars().count() > max_len {
        return Err(DashboardError::validation(
            field,
            format!("at most {max_len} characters"),
        ));
    }
    Ok(value.to_string())
}

fn positive(field: &str, value: &str) -> Result<i64, DashboardError> {
    let n: i64 = value
        .trim()
        .parse()
        .map_err(|_| DashboardError::validation(field, "must be a whole number"))?;
    if n < 1 {
        return Err(DashboardError::validation(field, "must be at least 1"));
    }
    Ok(n)
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
