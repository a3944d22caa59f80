//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Record;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivering,
    Completed,
    Retrieved,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Delivering,
        OrderStatus::Completed,
        OrderStatus::Retrieved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Retrieved => "retrieved",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Customer complaint filed against an order
///
/// Stored as an integer: 0 none, 1 not delivered, 2 quality issue,
/// 3 wrong item, -1 handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum ReportStatus {
    #[default]
    None,
    NotDelivered,
    QualityIssue,
    WrongItem,
    Handled,
}

impl ReportStatus {
    pub const fn code(&self) -> i8 {
        match self {
            ReportStatus::None => 0,
            ReportStatus::NotDelivered => 1,
            ReportStatus::QualityIssue => 2,
            ReportStatus::WrongItem => 3,
            ReportStatus::Handled => -1,
        }
    }

    /// A complaint is waiting for staff
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            ReportStatus::NotDelivered | ReportStatus::QualityIssue | ReportStatus::WrongItem
        )
    }
}

impl From<ReportStatus> for i8 {
    fn from(status: ReportStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i8> for ReportStatus {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReportStatus::None),
            1 => Ok(ReportStatus::NotDelivered),
            2 => Ok(ReportStatus::QualityIssue),
            3 => Ok(ReportStatus::WrongItem),
            -1 => Ok(ReportStatus::Handled),
            other => Err(format!("unknown report status {}", other)),
        }
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub name: String,
    /// Unit price
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderLine {
    /// price × quantity
    pub fn revenue(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub report_status: ReportStatus,
    /// Unix millis
    pub created_at: i64,
    /// Account reference of the customer
    pub customer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Record for Order {
    const COLLECTION: &'static str = "orders";
    const RESOURCE: &'static str = "Order";

    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        if self.total.is_sign_negative() {
            return Err(format!("order {} has a negative total", self.id));
        }
        Ok(())
    }
}

/// Partial order update (only `Some` fields are written)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_status: Option<ReportStatus>,
}
