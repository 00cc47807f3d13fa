use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Delivering,
    Completed,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OrderStatus::New => write!(f, "new"),
            OrderStatus::Delivering => write!(f, "delivering"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(OrderStatus::New),
            "delivering" => Ok(OrderStatus::Delivering),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid order status: {}", s)),
        }
    }
}

/// Client-submitted order body. Untrusted: the claimed total and item ids are
/// verified against the catalog before anything is persisted, and free-text
/// fields are sanitized.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderDraft {
    #[validate(length(min = 1, message = "items must not be empty"))]
    pub items: Vec<Uuid>,
    pub total: f64,
    #[validate(email)]
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub payment: String,
    #[serde(default)]
    pub comment: String,
}

/// Persistable order shape produced by order validation. All free-text fields
/// are already escaped and length-capped, the phone is in E.164.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub items: Vec<Uuid>,
    pub total_amount: f64,
    pub payment: String,
    pub email: String,
    pub phone: String,
    pub delivery_address: String,
    pub comment: String,
}

/// Stored order as returned by the repository collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: i64,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub items: Vec<Uuid>,
    pub customer_id: Uuid,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
}
