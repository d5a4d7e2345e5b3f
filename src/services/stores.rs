//! Persistence contracts of the session and purchase services.

use crate::error::AppResult;
use crate::models::{Expense, Member, NewPurchase, Purchase, Session, User};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user, or refresh the username of an existing one
    async fn upsert_user(&self, id: i64, username: &str) -> AppResult<User>;

    /// Case-insensitive lookup
    async fn user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn session_users(&self, session_id: Uuid) -> AppResult<Vec<User>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn active_in_chat(&self, chat_id: i64) -> AppResult<Option<Session>>;

    async fn create_session(&self, title: &str, creator_id: i64, chat_id: i64)
        -> AppResult<Session>;

    /// Returns false if the session was already finished
    async fn finish_session(&self, session_id: Uuid) -> AppResult<bool>;

    /// Adding an existing member is a no-op
    async fn add_member(&self, session_id: Uuid, user_id: i64) -> AppResult<Member>;
}

#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn create_purchases(
        &self,
        session_id: Uuid,
        buyer_id: i64,
        purchases: &[NewPurchase],
    ) -> AppResult<Vec<Purchase>>;

    /// Purchases of a session ordered by id
    async fn session_purchases(&self, session_id: Uuid) -> AppResult<Vec<Purchase>>;

    async fn purchase_in_session(
        &self,
        session_id: Uuid,
        purchase_id: i64,
    ) -> AppResult<Option<Purchase>>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Skips consumers already recorded for the same purchase.
    /// Returns the number of inserted rows.
    async fn create_expenses(&self, expenses: &[Expense]) -> AppResult<u64>;
}
