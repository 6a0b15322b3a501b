//! Balance export
//!
//! Writes computed balances as JSON, YAML or CSV.

use std::io::Write;

use serde::Serialize;

use crate::error::{BalanceError, BalanceResult};
use crate::models::{AccountId, MonthMode, MonthlyBalances, PeriodBalance};

/// Export document for a balance computation
#[derive(Debug, Clone, Serialize)]
pub struct BalanceExport {
    /// Selected account, `None` for the consolidated view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountId>,
    pub mode: MonthMode,
    pub financial_start_day: u32,
    pub balances: MonthlyBalances,
}

#[derive(Serialize)]
struct StatementCsvRow {
    month: String,
    start: String,
    end: String,
    opening: String,
    income: String,
    expense: String,
    transfers_in: String,
    transfers_out: String,
    closing: String,
    adjusted: bool,
}

/// Write any serializable value as pretty JSON
pub fn export_json<T: Serialize, W: Write>(value: &T, writer: &mut W) -> BalanceResult<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer).map_err(|e| BalanceError::Export(e.to_string()))
}

/// Write any serializable value as YAML
pub fn export_yaml<T: Serialize, W: Write>(value: &T, writer: &mut W) -> BalanceResult<()> {
    serde_yaml::to_writer(writer, value).map_err(|e| BalanceError::Export(e.to_string()))
}

/// Write final balances as `month,balance` rows
pub fn export_balances_csv<W: Write>(balances: &MonthlyBalances, writer: W) -> BalanceResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["month", "balance"])?;
    for (key, balance) in balances.iter() {
        csv_writer.write_record([key.to_string(), balance.to_string()])?;
    }
    csv_writer
        .flush()
        .map_err(|e| BalanceError::Export(e.to_string()))
}

/// Write a statement with one row per period
pub fn export_statement_csv<W: Write>(rows: &[PeriodBalance], writer: W) -> BalanceResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(StatementCsvRow {
            month: row.key.to_string(),
            start: row.period.start.to_string(),
            end: row.period.end.to_string(),
            opening: row.opening.to_string(),
            income: row.income.to_string(),
            expense: row.expense.to_string(),
            transfers_in: row.transfers_in.to_string(),
            transfers_out: row.transfers_out.to_string(),
            closing: row.closing.to_string(),
            adjusted: row.is_adjusted,
        })?;
    }
    csv_writer
        .flush()
        .map_err(|e| BalanceError::Export(e.to_string()))
}
