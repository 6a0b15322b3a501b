//! Display formatting for terminal output
//!
//! Formats balances, statements, forecasts and settings as aligned text
//! tables.

pub mod balance;
pub mod settings;

pub use balance::{format_forecast, format_monthly_balances, format_period, format_statement};
pub use settings::format_settings;
