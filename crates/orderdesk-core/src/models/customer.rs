use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer record as returned by the repository collaborator. The aggregate
/// fields (`total_amount`, `order_count`, `last_order_date`) are maintained by
/// the store and are what the admin listing filters range over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_order_date: Option<DateTime<Utc>>,
    pub last_order: Option<Uuid>,
    pub total_amount: f64,
    pub order_count: u64,
}
