use crate::debts::CatalogItem;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Purchase made by one buyer within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Purchase {
    pub id: i64,
    pub title: String,
    pub buyer_id: i64,
    pub session_id: Uuid,
    pub price: i64, // smallest currency unit
    pub quantity: i32,
    pub created_at: NaiveDateTime,
}

/// Purchase input before it is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub title: String,
    pub price: i64,
    pub quantity: i32,
}

impl NewPurchase {
    pub fn new(title: impl Into<String>, price: i64, quantity: i32) -> Self {
        Self {
            title: title.into(),
            price,
            quantity,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Purchase title must not be empty".to_string());
        }
        if self.price < 0 {
            return Err(format!("Price of '{}' must not be negative", self.title));
        }
        if self.quantity < 1 {
            return Err(format!("Quantity of '{}' must be at least 1", self.title));
        }
        Ok(())
    }
}

/// Purchase joined with the number of its consumption records
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CatalogRow {
    pub id: i64,
    pub title: String,
    pub price: i64,
    pub consumer_count: i64,
}

impl From<CatalogRow> for CatalogItem {
    fn from(row: CatalogRow) -> Self {
        CatalogItem::new(row.id, row.title, row.price, row.consumer_count)
    }
}
