//! Core data models for Mabourse
//!
//! This module contains the data structures of the balance domain: money,
//! accounts, transactions, periods, adjustments and computed balances.

pub mod adjustment;
pub mod balance;
pub mod date;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use adjustment::{AdjustmentRecord, BalanceAdjustment};
pub use balance::{MonthlyBalances, PeriodBalance};
pub use date::parse_date;
pub use ids::AccountId;
pub use money::Money;
pub use period::{days_in_month, MonthKey, MonthMode, Period};
pub use transaction::{Transaction, TransactionKind, TransactionRecord};
