//! Manual order submission and order history records.

use serde::{Deserialize, Serialize};

use crate::domain::error::DashboardError;
use crate::domain::order_params::{Choice, DayTrade, OpenCloseFlag, OrderCondition, OrderType, Side};

pub const MAX_NOTE_LEN: usize = 10;

/// Body of `POST /order`. Submitted once, never kept client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub actno: Option<String>,
    pub subactno: String,
    pub productid: String,
    pub bs: Side,
    pub ordertype: OrderType,
    pub price: f64,
    pub orderqty: i64,
    pub ordercondition: OrderCondition,
    pub opencloseflag: OpenCloseFlag,
    pub dtrade: DayTrade,
    pub note: String,
    pub strategy: Option<String>,
}

impl OrderRequest {
    /// Client-side checks that must pass before anything is sent.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.productid.trim().is_empty() {
            return Err(DashboardError::validation("productid", "required"));
        }
        if self.orderqty < 1 {
            return Err(DashboardError::validation("orderqty", "must be at least 1"));
        }
        if self.price < 0.0 {
            return Err(DashboardError::validation("price", "must not be negative"));
        }
        if self.note.chars().count() > MAX_NOTE_LEN {
            return Err(DashboardError::validation(
                "note",
                format!("at most {MAX_NOTE_LEN} characters"),
            ));
        }
        Ok(())
    }
}

/// Response of `POST /order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/// Text form of the manual order form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderDraft {
    #[serde(default)]
    pub actno: String,
    #[serde(default)]
    pub subactno: String,
    #[serde(default)]
    pub productid: String,
    pub bs: String,
    pub ordertype: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub orderqty: String,
    pub ordercondition: String,
    #[serde(default)]
    pub opencloseflag: String,
    #[serde(default = "default_dtrade")]
    pub dtrade: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub strategy: String,
}

fn default_dtrade() -> String {
    DayTrade::No.code().to_string()
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            actno: String::new(),
            subactno: String::new(),
            productid: String::new(),
            bs: Side::Buy.code().into(),
            ordertype: OrderType::Limit.code().into(),
            price: "0".into(),
            orderqty: "1".into(),
            ordercondition: OrderCondition::Rod.code().into(),
            opencloseflag: OpenCloseFlag::Auto.code().into(),
            dtrade: DayTrade::No.code().into(),
            note: String::new(),
            strategy: String::new(),
        }
    }
}

impl OrderDraft {
    pub fn validate(&self) -> Result<OrderRequest, DashboardError> {
        let orderqty: i64 = self
            .orderqty
            .trim()
            .parse()
            .map_err(|_| DashboardError::validation("orderqty", "must be a whole number"))?;
        let price: f64 = match self.price.trim() {
            "" => 0.0,
            p => p
                .parse()
                .map_err(|_| DashboardError::validation("price", "must be a number"))?,
        };

        let request = OrderRequest {
            actno: non_blank(&self.actno),
            subactno: self.subactno.trim().to_string(),
            productid: self.productid.trim().to_string(),
            bs: Side::parse("bs", &self.bs)?,
            ordertype: OrderType::parse("ordertype", &self.ordertype)?,
            price,
            orderqty,
            ordercondition: OrderCondition::parse("ordercondition", &self.ordercondition)?,
            opencloseflag: OpenCloseFlag::parse("opencloseflag", &self.opencloseflag)?,
            dtrade: DayTrade::parse("dtrade", &self.dtrade)?,
            note: self.note.trim().to_string(),
            strategy: non_blank(&self.strategy),
        };
        request.validate()?;
        Ok(request)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// One row of `GET /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub symbol: String,
    pub action: String,
    pub quantity: i64,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub order_condition: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub order_result: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub fill_status: Option<String>,
    #[serde(default)]
    pub fill_quantity: Option<i64>,
    #[serde(default)]
    pub fill_price: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl OrderRecord {
    /// Broker order id, falling back to the serialized broker result.
    pub fn reference(&self) -> &str {
        self.order_id
            .as_deref()
            .or(self.order_result.as_deref())
            .unwrap_or("")
    }

    pub fn has_fill(&self) -> bool {
        self.fill_quantity.is_some_and(|q| q > 0)
            || matches!(self.status.as_str(), "filled" | "partial_filled")
    }
}
