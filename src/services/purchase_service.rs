use crate::error::{AppError, AppResult};
use crate::models::{EaterRef, Expense, NewExpense, NewPurchase, Purchase, Session};
use crate::services::{ExpenseStore, PurchaseStore, SessionService, UserStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Service for recording purchases and who consumed them
pub struct PurchaseService {
    session_service: Arc<SessionService>,
    purchases: Arc<dyn PurchaseStore>,
    expenses: Arc<dyn ExpenseStore>,
    users: Arc<dyn UserStore>,
}

impl PurchaseService {
    pub fn new(
        session_service: Arc<SessionService>,
        purchases: Arc<dyn PurchaseStore>,
        expenses: Arc<dyn ExpenseStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            session_service,
            purchases,
            expenses,
            users,
        }
    }

    /// Record purchases paid by one buyer in the chat's active session
    pub async fn add_purchases(
        &self,
        chat_id: i64,
        buyer_id: i64,
        buyer_username: &str,
        purchases: &[NewPurchase],
    ) -> AppResult<Vec<Purchase>> {
        if purchases.is_empty() {
            return Err(AppError::Validation("No purchases given".into()));
        }
        for purchase in purchases {
            purchase.validate().map_err(AppError::Validation)?;
        }

        let session = self.session_service.require_active(chat_id).await?;
        let (buyer, _) = self
            .session_service
            .init_member(&session, buyer_id, buyer_username)
            .await?;

        let created = self
            .purchases
            .create_purchases(session.id, buyer.id, purchases)
            .await?;

        info!(
            "Added {} purchase(s) by @{} to session {}",
            created.len(),
            buyer.username,
            session.id
        );
        Ok(created)
    }

    pub async fn list_purchases(&self, chat_id: i64) -> AppResult<Vec<Purchase>> {
        let session = self.session_service.require_active(chat_id).await?;
        self.purchases.session_purchases(session.id).await
    }

    /// Record who consumed which purchase. Returns the number of new expense rows.
    pub async fn add_expenses(
        &self,
        chat_id: i64,
        author_id: i64,
        author_username: &str,
        expenses: &[NewExpense],
    ) -> AppResult<u64> {
        if expenses.is_empty() {
            return Err(AppError::Validation("No expenses given".into()));
        }

        let session = self.session_service.require_active(chat_id).await?;
        let (author, _) = self
            .session_service
            .init_member(&session, author_id, author_username)
            .await?;

        let mut rows = Vec::new();
        for expense in expenses {
            self.purchases
                .purchase_in_session(session.id, expense.purchase_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Purchase #{} is not part of this session",
                        expense.purchase_id
                    ))
                })?;

            let eater_ids = self
                .collect_eater_ids(&session, author.id, &expense.eaters)
                .await?;
            debug!(
                "Purchase #{} consumed by {} user(s)",
                expense.purchase_id,
                eater_ids.len()
            );

            rows.extend(
                eater_ids
                    .into_iter()
                    .map(|eater_id| Expense::new(expense.purchase_id, eater_id, session.id)),
            );
        }

        let inserted = self.expenses.create_expenses(&rows).await?;
        info!(
            "Added {} expense(s) by @{} to session {}",
            inserted, author.username, session.id
        );
        Ok(inserted)
    }

    async fn collect_eater_ids(
        &self,
        session: &Session,
        author_id: i64,
        eaters: &[EaterRef],
    ) -> AppResult<Vec<i64>> {
        if eaters.is_empty() {
            return Ok(vec![author_id]);
        }

        let mut ids = Vec::new();
        for eater in eaters {
            match eater {
                EaterRef::Me => ids.push(author_id),
                EaterRef::All => {
                    let members = self.session_service.members(session).await?;
                    ids.extend(members.into_iter().map(|user| user.id));
                }
                EaterRef::Username(username) => {
                    let user = self
                        .users
                        .user_by_username(username)
                        .await?
                        .ok_or_else(|| AppError::NotFound(format!("Unknown user @{}", username)))?;
                    self.session_service
                        .init_member(session, user.id, &user.username)
                        .await?;
                    ids.push(user.id);
                }
            }
        }

        Ok(dedup_ids(ids))
    }
}

/// Remove repeated ids, keeping the first occurrence
pub fn dedup_ids(ids: Vec<i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
