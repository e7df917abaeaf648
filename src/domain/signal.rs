//! Trading signals: the history the backend recorded, and manual sends.

use serde::{Deserialize, Serialize};

use crate::domain::display::percent_encode;
use crate::domain::error::DashboardError;
use crate::domain::order::MAX_NOTE_LEN;
use crate::domain::order_params::Choice;

pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// The backend caps page size at this value.
pub const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    LongEntry,
    LongExit,
    ShortEntry,
    ShortExit,
}

impl Choice for SignalKind {
    const ALL: &'static [Self] = &[
        Self::LongEntry,
        Self::LongExit,
        Self::ShortEntry,
        Self::ShortExit,
    ];

    fn code(&self) -> &'static str {
        match self {
            Self::LongEntry => "long_entry",
            Self::LongExit => "long_exit",
            Self::ShortEntry => "short_entry",
            Self::ShortExit => "short_exit",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::LongEntry => "多單進場",
            Self::LongExit => "多單出場",
            Self::ShortEntry => "空單進場",
            Self::ShortExit => "空單出場",
        }
    }
}

/// A processed signal as recorded by the backend. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalHistory {
    pub id: i64,
    pub strategy_name: String,
    pub signal_type: String,
    #[serde(default)]
    pub signal_product: Option<String>,
    #[serde(default)]
    pub signal_quantity: Option<i64>,
    #[serde(default)]
    pub signal_price: Option<f64>,
    #[serde(default)]
    pub signal_note: Option<String>,
    #[serde(default)]
    pub actual_product: Option<String>,
    #[serde(default)]
    pub actual_quantity: Option<i64>,
    #[serde(default)]
    pub actual_bs: Option<String>,
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub raw_payload: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: String,
}

impl SignalHistory {
    /// Failed and ignored signals are what an operator needs to look at.
    pub fn needs_attention(&self) -> bool {
        matches!(self.status.as_str(), "failed" | "ignored")
    }

    pub fn kind_label(&self) -> String {
        SignalKind::parse("signal_type", &self.signal_type)
            .map(|k| k.label().to_string())
            .unwrap_or_else(|_| self.signal_type.clone())
    }

    pub fn pretty_payload(&self) -> String {
        self.raw_payload
            .as_ref()
            .and_then(|v| serde_json::to_string_pretty(v).ok())
            .unwrap_or_default()
    }
}

/// Paging and filter for `GET /signals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for SignalQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            strategy: None,
        }
    }
}

impl SignalQuery {
    pub fn recent(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Clamp to what the backend accepts and drop a blank strategy filter.
    pub fn normalized(mut self) -> Self {
        self.limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        self.strategy = self
            .strategy
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn previous(&self) -> Option<Self> {
        (self.offset > 0).then(|| Self {
            offset: self.offset.saturating_sub(self.limit),
            ..self.clone()
        })
    }

    /// A full page suggests there may be more rows. None at the end of the
    /// offset range.
    pub fn next(&self, rows_returned: usize) -> Option<Self> {
        if rows_returned < self.limit as usize {
            return None;
        }
        let offset = self.offset.checked_add(self.limit)?;
        Some(Self {
            offset,
            ..self.clone()
        })
    }

    pub fn to_query_string(&self) -> String {
        let mut qs = format!("limit={}&offset={}", self.limit, self.offset);
        if let Some(s) = &self.strategy {
            qs.push_str("&strategy=");
            qs.push_str(&percent_encode(s));
        }
        qs
    }
}

/// Body of `POST /signal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRequest {
    pub strategy: String,
    pub signal: SignalKind,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResponse {
    pub status: String,
    #[serde(default)]
    pub signal_id: Option<i64>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub actual_product: Option<String>,
    #[serde(default)]
    pub actual_quantity: Option<i64>,
}

impl SignalResponse {
    pub fn summary(&self) -> String {
        match &self.message {
            Some(m) => format!("{}：{}", self.status, m),
            None => self.status.clone(),
        }
    }
}

/// Text form of the manual signal form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalDraft {
    #[serde(default)]
    pub strategy: String,
    pub signal: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub note: String,
}

impl Default for SignalDraft {
    fn default() -> Self {
        Self {
            strategy: String::new(),
            signal: SignalKind::LongEntry.code().into(),
            quantity: "1".into(),
            price: String::new(),
            product: String::new(),
            note: String::new(),
        }
    }
}

impl SignalDraft {
    pub fn validate(&self) -> Result<SignalRequest, DashboardError> {
        let strategy = self.strategy.trim();
        if strategy.is_empty() {
            return Err(DashboardError::validation("strategy", "required"));
        }
        let quantity: i64 = match self.quantity.trim() {
            "" => 1,
            q => q
                .parse()
                .map_err(|_| DashboardError::validation("quantity", "must be a whole number"))?,
        };
        if quantity < 1 {
            return Err(DashboardError::validation("quantity", "must be at least 1"));
        }
        let price = match self.price.trim() {
            "" => None,
            p => Some(
                p.parse::<f64>()
                    .map_err(|_| DashboardError::validation("price", "must be a number"))?,
            ),
        };
        let note = self.note.trim();
        if note.chars().count() > MAX_NOTE_LEN {
            return Err(DashboardError::validation(
                "note",
                format!("at most {MAX_NOTE_LEN} characters"),
            ));
        }
        let product = self.product.trim();

        Ok(SignalRequest {
            strategy: strategy.to_string(),
            signal: SignalKind::parse("signal", &self.signal)?,
            quantity,
            price,
            product: (!product.is_empty()).then(|| product.to_string()),
            note: (!note.is_empty()).then(|| note.to_string()),
        })
    }
}
