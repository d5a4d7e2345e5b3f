pub mod debt_service;
pub mod purchase_service;
pub mod session_service;
pub mod stores;

pub use debt_service::DebtService;
pub use purchase_service::PurchaseService;
pub use session_service::SessionService;
pub use stores::{ExpenseStore, PurchaseStore, SessionStore, UserStore};
