use crate::debts::ConsumptionRecord;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One consumed share of a purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub purchase_id: i64,
    pub eater_id: i64,
    pub session_id: Uuid,
    pub quantity: i32,
}

impl Expense {
    pub fn new(purchase_id: i64, eater_id: i64, session_id: Uuid) -> Self {
        Self {
            purchase_id,
            eater_id,
            session_id,
            quantity: 1,
        }
    }
}

/// Who consumed which purchase, as typed in the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub purchase_id: i64,
    pub eaters: Vec<EaterRef>,
}

/// Reference to a consumer in an expense line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EaterRef {
    /// The author of the message
    Me,
    /// Every member of the session
    All,
    Username(String),
}

/// Expense joined with the consumer and the buyer of the purchase
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExpenseRecordRow {
    pub purchase_id: i64,
    pub eater_id: i64,
    pub eater_username: String,
    pub buyer_id: i64,
    pub buyer_username: String,
}

impl From<ExpenseRecordRow> for ConsumptionRecord {
    fn from(row: ExpenseRecordRow) -> Self {
        ConsumptionRecord {
            purchase_id: row.purchase_id,
            consumer_id: row.eater_id,
            consumer_name: row.eater_username,
            buyer_id: row.buyer_id,
            buyer_name: row.buyer_username,
        }
    }
}
