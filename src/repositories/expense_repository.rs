use crate::debts::{ConsumptionRecord, ExpenseRecordSource};
use crate::error::{AppResult, RepositoryResult};
use crate::models::{Expense, ExpenseRecordRow};
use crate::services::ExpenseStore;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for expense (consumption) data access
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert expenses in one transaction, skipping consumers already recorded
    /// for the same purchase. Returns the number of inserted rows.
    pub async fn create_many(&self, expenses: &[Expense]) -> RepositoryResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for expense in expenses {
            inserted += sqlx::query(
                r#"
                INSERT INTO expenses (purchase_id, eater_id, session_id, quantity)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (purchase_id, eater_id) DO NOTHING
                "#,
            )
            .bind(expense.purchase_id)
            .bind(expense.eater_id)
            .bind(expense.session_id)
            .bind(expense.quantity)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn find_by_purchase(&self, purchase_id: i64) -> RepositoryResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT purchase_id, eater_id, session_id, quantity
            FROM expenses
            WHERE purchase_id = $1
            ORDER BY eater_id ASC
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Every expense of a session with consumer and buyer names resolved
    pub async fn find_records(&self, session_id: Uuid) -> RepositoryResult<Vec<ExpenseRecordRow>> {
        let rows = sqlx::query_as::<_, ExpenseRecordRow>(
            r#"
            SELECT e.purchase_id,
                   eu.id AS eater_id,
                   eu.username AS eater_username,
                   bu.id AS buyer_id,
                   bu.username AS buyer_username
            FROM expenses e
                JOIN users eu ON e.eater_id = eu.id
                JOIN purchases p ON e.purchase_id = p.id
                JOIN users bu ON p.buyer_id = bu.id
            WHERE e.session_id = $1
            ORDER BY e.purchase_id ASC, eu.id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl ExpenseRecordSource for ExpenseRepository {
    async fn records(&self, session_id: Uuid) -> AppResult<Vec<ConsumptionRecord>> {
        let rows = self.find_records(session_id).await?;
        Ok(rows.into_iter().map(ConsumptionRecord::from).collect())
    }
}

#[async_trait]
impl ExpenseStore for ExpenseRepository {
    async fn create_expenses(&self, expenses: &[Expense]) -> AppResult<u64> {
        Ok(self.create_many(expenses).await?)
    }
}
