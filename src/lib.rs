//! Mabourse - monthly account balances
//!
//! This library computes end-of-month balances of accounts from a ledger of
//! income, expense and transfer transactions. Months are either calendar
//! months or financial months starting on a fixed day `k`, in which case the
//! month keyed `YYYY-MM` starts on `min(k, days in that month)`.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings file and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, periods, transactions, adjustments)
//! - `services`: Period resolution, balance accumulation and forecasts
//! - `storage`: Ledger loading, JSON file helpers and the balance cache
//! - `logging`: Structured log store fed by `tracing`
//! - `crypto`: Password hashing for protected operations
//! - `display` and `export`: Terminal tables and JSON/YAML/CSV output
//! - `cli`: Command handlers used by the binary
//!
//! # Example
//!
//! ```
//! use mabourse::models::{parse_date, AccountId, Money, MonthKey, Transaction};
//! use mabourse::services::{accumulate, BalanceRequest, PeriodResolver};
//!
//! # fn main() -> Result<(), mabourse::BalanceError> {
//! let account = AccountId::new("A");
//! let transactions = vec![
//!     Transaction::income(parse_date("2024-01-20")?, Money::from_units(500), Some(account.clone())),
//!     Transaction::expense(parse_date("2024-02-03")?, Money::from_units(300), Some(account.clone())),
//! ];
//!
//! let request = BalanceRequest::new(
//!     parse_date("2024-01-01")?,
//!     Money::from_units(1000),
//!     PeriodResolver::financial(15)?,
//!     parse_date("2024-02-29")?,
//! )
//! .for_account(account);
//! let balances = accumulate(&transactions, &request, None)?;
//!
//! // Financial months are keyed by the month they start in
//! assert_eq!(balances.get(&MonthKey::new(2023, 12)?), Some(Money::from_units(1000)));
//! assert_eq!(balances.get(&MonthKey::new(2024, 1)?), Some(Money::from_units(1200)));
//! assert_eq!(balances.get(&MonthKey::new(2024, 2)?), Some(Money::from_units(1200)));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BalanceError, BalanceResult};
