use crate::debts::{CatalogItem, ProductCatalog};
use crate::error::{AppResult, RepositoryResult};
use crate::models::{CatalogRow, NewPurchase, Purchase};
use crate::services::PurchaseStore;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for purchase data access
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert purchases of one buyer in a single transaction
    pub async fn create_many(
        &self,
        session_id: Uuid,
        buyer_id: i64,
        purchases: &[NewPurchase],
    ) -> RepositoryResult<Vec<Purchase>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(purchases.len());

        for purchase in purchases {
            let row = sqlx::query_as::<_, Purchase>(
                r#"
                INSERT INTO purchases (title, buyer_id, session_id, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, title, buyer_id, session_id, price, quantity, created_at
                "#,
            )
            .bind(&purchase.title)
            .bind(buyer_id)
            .bind(session_id)
            .bind(purchase.price)
            .bind(purchase.quantity)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_session(&self, session_id: Uuid) -> RepositoryResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, title, buyer_id, session_id, price, quantity, created_at
            FROM purchases
            WHERE session_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Find a purchase only if it belongs to the given session
    pub async fn find_in_session(
        &self,
        session_id: Uuid,
        purchase_id: i64,
    ) -> RepositoryResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, title, buyer_id, session_id, price, quantity, created_at
            FROM purchases
            WHERE session_id = $1 AND id = $2
            "#,
        )
        .bind(session_id)
        .bind(purchase_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    /// Purchases that have consumers, with the number of consumers of each
    pub async fn find_catalog(&self, session_id: Uuid) -> RepositoryResult<Vec<CatalogRow>> {
        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT p.id, p.title, p.price, COUNT(e.eater_id) AS consumer_count
            FROM purchases p
                JOIN expenses e ON e.purchase_id = p.id
            WHERE p.session_id = $1
            GROUP BY p.id, p.title, p.price
            ORDER BY p.id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl ProductCatalog for PurchaseRepository {
    async fn catalog(&self, session_id: Uuid) -> AppResult<Vec<CatalogItem>> {
        let rows = self.find_catalog(session_id).await?;
        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }
}

#[async_trait]
impl PurchaseStore for PurchaseRepository {
    async fn create_purchases(
        &self,
        session_id: Uuid,
        buyer_id: i64,
        purchases: &[NewPurchase],
    ) -> AppResult<Vec<Purchase>> {
        Ok(self.create_many(session_id, buyer_id, purchases).await?)
    }

    async fn session_purchases(&self, session_id: Uuid) -> AppResult<Vec<Purchase>> {
        Ok(self.find_by_session(session_id).await?)
    }

    async fn purchase_in_session(
        &self,
        session_id: Uuid,
        purchase_id: i64,
    ) -> AppResult<Option<Purchase>> {
        Ok(self.find_in_session(session_id, purchase_id).await?)
    }
}
