use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User model keyed by the Telegram user id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: NaiveDateTime,
}

impl User {
    /// Username as it is written in a chat mention
    pub fn mention(&self) -> String {
        format!("@{}", self.username)
    }
}
