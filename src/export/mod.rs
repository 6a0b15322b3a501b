//! Export module for Mabourse
//!
//! Structured output of computed balances:
//! - JSON and YAML for any serializable result
//! - CSV for monthly balances and statements (spreadsheet-compatible)

pub mod balances;

pub use balances::{
    export_balances_csv, export_json, export_statement_csv, export_yaml, BalanceExport,
};
