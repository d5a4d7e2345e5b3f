//! Collector Backend Library
//!
//! Group expense tracking for chats: sessions, purchases, who consumed what,
//! and the debt settlement that turns it into "who owes whom".

pub mod bot;
pub mod config;
pub mod database;
pub mod debts;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use debts::{DebtCalculator, Ledger};
pub use error::{AppError, AppResult};

use bot::BotHandler;
use database::Database;
use repositories::*;
use services::{DebtService, PurchaseService, SessionService};
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub database: Database,
    pub user_repo: Arc<UserRepository>,
    pub session_repo: Arc<SessionRepository>,
    pub purchase_repo: Arc<PurchaseRepository>,
    pub expense_repo: Arc<ExpenseRepository>,
    pub session_service: Arc<SessionService>,
    pub purchase_service: Arc<PurchaseService>,
    pub debt_service: Arc<DebtService>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(pool: sqlx::PgPool) -> Self {
        let database = Database::new(pool.clone());

        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let session_repo = Arc::new(SessionRepository::new(pool.clone()));
        let purchase_repo = Arc::new(PurchaseRepository::new(pool.clone()));
        let expense_repo = Arc::new(ExpenseRepository::new(pool));

        let session_service = Arc::new(SessionService::new(
            session_repo.clone(),
            user_repo.clone(),
        ));
        let purchase_service = Arc::new(PurchaseService::new(
            session_service.clone(),
            purchase_repo.clone(),
            expense_repo.clone(),
            user_repo.clone(),
        ));
        let debt_service = Arc::new(DebtService::new(
            session_repo.clone(),
            purchase_repo.clone(),
            expense_repo.clone(),
        ));

        Self {
            database,
            user_repo,
            session_repo,
            purchase_repo,
            expense_repo,
            session_service,
            purchase_service,
            debt_service,
        }
    }

    /// Chat handler wired to this state's services
    pub fn bot_handler(&self) -> BotHandler {
        BotHandler::new(
            self.session_service.clone(),
            self.purchase_service.clone(),
            self.debt_service.clone(),
        )
    }
}
