//! Order parameter codes shared by strategies, manual orders and signals.
//!
//! Each enum serializes to the backend's wire code and carries the label the
//! dashboard shows next to it.

use serde::{Deserialize, Serialize};

use crate::domain::error::DashboardError;

/// A closed set of wire codes that can be rendered as a `<select>`.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn code(&self) -> &'static str;

    fn label(&self) -> &'static str;

    fn parse(field: &str, code: &str) -> Result<Self, DashboardError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code.trim())
            .ok_or_else(|| DashboardError::validation(field, format!("unknown code '{code}'")))
    }
}

/// One `<option>` of a rendered select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: String,
    pub selected: bool,
}

pub fn select_options<T: Choice>(current: &str) -> Vec<SelectOption> {
    T::ALL
        .iter()
        .map(|c| SelectOption {
            value: c.code(),
            label: if c.code().is_empty() {
                c.label().to_string()
            } else {
                format!("{} ({})", c.label(), c.code())
            },
            selected: c.code() == current,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "L")]
    Limit,
    #[serde(rename = "M")]
    Market,
    #[serde(rename = "P")]
    RangeMarket,
}

impl Choice for OrderType {
    const ALL: &'static [Self] = &[Self::Limit, Self::Market, Self::RangeMarket];

    fn code(&self) -> &'static str {
        match self {
            Self::Limit => "L",
            Self::Market => "M",
            Self::RangeMarket => "P",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Limit => "限價",
            Self::Market => "市價",
            Self::RangeMarket => "範圍市價",
        }
    }
}

/// Time-in-force. ROD is listed first because it is the form default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCondition {
    #[serde(rename = "R")]
    Rod,
    #[serde(rename = "I")]
    Ioc,
    #[serde(rename = "F")]
    Fok,
}

impl Choice for OrderCondition {
    const ALL: &'static [Self] = &[Self::Rod, Self::Ioc, Self::Fok];

    fn code(&self) -> &'static str {
        match self {
            Self::Rod => "R",
            Self::Ioc => "I",
            Self::Fok => "F",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Rod => "ROD",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayTrade {
    #[serde(rename = "N")]
    No,
    #[serde(rename = "Y")]
    Yes,
}

impl Choice for DayTrade {
    const ALL: &'static [Self] = &[Self::No, Self::Yes];

    fn code(&self) -> &'static str {
        match self {
            Self::No => "N",
            Self::Yes => "Y",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::No => "否",
            Self::Yes => "是",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "B")]
    Buy,
    #[serde(rename = "S")]
    Sell,
}

impl Choice for Side {
    const ALL: &'static [Self] = &[Self::Buy, Self::Sell];

    fn code(&self) -> &'static str {
        match self {
            Self::Buy => "B",
            Self::Sell => "S",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Buy => "買",
            Self::Sell => "賣",
        }
    }
}

/// New/close position flag. The empty code lets the broker decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenCloseFlag {
    #[serde(rename = "")]
    Auto,
    #[serde(rename = "0")]
    Open,
    #[serde(rename = "1")]
    Close,
}

impl Choice for OpenCloseFlag {
    const ALL: &'static [Self] = &[Self::Auto, Self::Open, Self::Close];

    fn code(&self) -> &'static str {
        match self {
            Self::Auto => "",
            Self::Open => "0",
            Self::Close => "1",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Auto => "自動",
            Self::Open => "新倉",
            Self::Close => "平倉",
        }
    }
}

/// Render an order-type code as its label, passing unknown codes through.
pub fn order_type_label(code: &str) -> String {
    OrderType::parse("order_type", code)
        .map(|t| t.label().to_string())
        .unwrap_or_else(|_| code.to_string())
}

pub fn condition_label(code: &str) -> String {
    OrderCondition::parse("order_condition", code)
        .map(|c| c.label().to_string())
        .unwrap_or_else(|_| code.to_string())
}
