//! Storage layer for Mabourse
//!
//! Reads ledger files, persists settings and logs with atomic writes, and
//! holds the in-memory balance cache.

pub mod cache;
pub mod file_io;
pub mod ledger;

pub use cache::MonthlyBalanceCache;
pub use file_io::{read_json, write_json_atomic};
pub use ledger::{load_adjustments, load_transactions, LedgerFormat};
