//! Service layer for Mabourse
//!
//! Pure computations over loaded ledgers: period resolution, balance
//! accumulation and month forecasts. Nothing here performs I/O.

pub mod balance;
pub mod forecast;
pub mod period;

pub use balance::{accumulate, statement, BalanceRequest, BalanceService};
pub use forecast::{forecast_for_month, Forecast};
pub use period::{PeriodIter, PeriodResolver};
