use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry.
///
/// `price` is the authoritative price used for order-total verification; a
/// `None` price marks an entry that is not currently for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: Option<f64>,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the entry is currently eligible for purchase.
    pub fn is_sellable(&self) -> bool {
        self.price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: Option<f64>) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "mug".to_string(),
            price,
            category: "kitchen".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sellable() {
        assert!(product(Some(100.0)).is_sellable());
        assert!(!product(None).is_sellable());
    }
}
