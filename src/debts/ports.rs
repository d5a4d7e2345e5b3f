//! Collaborator contracts the debt service reads its input through.

use crate::debts::{CatalogItem, ConsumptionRecord};
use crate::error::AppResult;
use crate::models::Session;
use async_trait::async_trait;
use uuid::Uuid;

/// Resolves the purchases of a session that have at least one consumer
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// `consumer_count` of every returned item must equal the number of
    /// consumption records referencing it.
    async fn catalog(&self, session_id: Uuid) -> AppResult<Vec<CatalogItem>>;
}

/// Supplies every consumption record of a session, buyer included
#[async_trait]
pub trait ExpenseRecordSource: Send + Sync {
    async fn records(&self, session_id: Uuid) -> AppResult<Vec<ConsumptionRecord>>;
}

/// Finds the unfinished session of a chat
#[async_trait]
pub trait ActiveSessionSource: Send + Sync {
    async fn active_session(&self, chat_id: i64) -> AppResult<Option<Session>>;
}
