//! Debt settlement: turns consumed shares of purchases into a pairwise ledger.

pub mod calculator;
pub mod ports;

pub use calculator::{
    group_by_consumer, index_catalog, CatalogItem, ConsumptionRecord, DebtCalculator, DebtEdge,
    DebtError, DebtResult, Direction, HistoryEntry, Ledger, Money, Participant,
};
pub use ports::{ActiveSessionSource, ExpenseRecordSource, ProductCatalog};
