use crate::debts::{
    group_by_consumer, index_catalog, ActiveSessionSource, DebtCalculator, ExpenseRecordSource,
    Ledger, ProductCatalog,
};
use crate::error::{AppError, AppResult};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Computes who owes whom in a chat's active session
pub struct DebtService {
    sessions: Arc<dyn ActiveSessionSource>,
    catalog: Arc<dyn ProductCatalog>,
    records: Arc<dyn ExpenseRecordSource>,
}

impl DebtService {
    pub fn new(
        sessions: Arc<dyn ActiveSessionSource>,
        catalog: Arc<dyn ProductCatalog>,
        records: Arc<dyn ExpenseRecordSource>,
    ) -> Self {
        Self {
            sessions,
            catalog,
            records,
        }
    }

    /// Debts of the active session in a chat
    pub async fn get_all_debts(&self, chat_id: i64) -> AppResult<Ledger> {
        let session = self
            .sessions
            .active_session(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No active session in chat {}", chat_id)))?;

        self.settle_session(session.id).await
    }

    /// Debts of a session by id
    pub async fn settle_session(&self, session_id: Uuid) -> AppResult<Ledger> {
        let catalog = index_catalog(self.catalog.catalog(session_id).await?);
        let records = self.records.records(session_id).await?;
        let record_count = records.len();

        let participants = group_by_consumer(records);
        debug!(
            "Settling session {}: {} record(s), {} participant(s), {} purchase(s)",
            session_id,
            record_count,
            participants.len(),
            catalog.len()
        );

        let ledger = DebtCalculator::new(&participants, &catalog).calculate_checked()?;

        info!("Session {} settled with {} debt(s)", session_id, ledger.edge_count());
        Ok(ledger)
    }
}
