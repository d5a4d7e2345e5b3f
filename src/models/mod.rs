//! Domain models for the Collector backend.
//!
//! Database-backed entities of a group expense session, plus the row
//! projections the debt calculator is fed from.

pub mod expense;
pub mod purchase;
pub mod session;
pub mod user;

// Re-export all models for convenient access
pub use expense::{EaterRef, Expense, ExpenseRecordRow, NewExpense};
pub use purchase::{CatalogRow, NewPurchase, Purchase};
pub use session::{Member, Session, SessionState};
pub use user::User;
