pub mod expense_repository;
pub mod purchase_repository;
pub mod session_repository;
pub mod user_repository;

// Re-export all repositories for convenient access
pub use expense_repository::ExpenseRepository;
pub use purchase_repository::PurchaseRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;
