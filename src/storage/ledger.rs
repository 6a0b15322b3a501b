//! Ledger file loading
//!
//! Transactions and adjustments are read from CSV files with a header row
//! (`Date,Amount,Type,AccountId,ToAccountId` and
//! `YearMonth,AccountId,AdjustedBalance`) or from JSON arrays of objects with
//! the same field names. The format is chosen from the file extension.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::file_io::read_json;
use crate::error::{BalanceError, BalanceResult};
use crate::models::transaction::validate_records;
use crate::models::{AdjustmentRecord, Transaction, TransactionRecord};

/// On-disk format of a ledger file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerFormat {
    Csv,
    Json,
}

impl LedgerFormat {
    /// Guess the format from a path; anything but `.json` is read as CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Parse CSV rows into records, matching columns by header name
///
/// Cells are handed over as text, so `007` or `1e3` stay as written. Empty
/// cells count as absent.
pub fn parse_csv<T, R>(reader: R) -> BalanceResult<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| BalanceError::Csv(format!("row {}: {}", index + 1, e)))?;

        let fields: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();

        let record: T = serde_json::from_value(Value::Object(fields))
            .map_err(|e| BalanceError::Csv(format!("row {}: {}", index + 1, e)))?;
        records.push(record);
    }
    Ok(records)
}

/// Read raw records from a CSV or JSON file
pub fn read_records<T: DeserializeOwned>(path: &Path) -> BalanceResult<Vec<T>> {
    match LedgerFormat::from_path(path) {
        LedgerFormat::Json => read_json(path),
        LedgerFormat::Csv => {
            let file = std::fs::File::open(path).map_err(|e| {
                BalanceError::Io(format!("Failed to open {}: {}", path.display(), e))
            })?;
            parse_csv(file).map_err(|e| BalanceError::Csv(format!("{}: {}", path.display(), e)))
        }
    }
}

/// Load and validate the transactions of a ledger file
///
/// Fails on the first row missing a required field.
pub fn load_transactions(path: &Path) -> BalanceResult<Vec<Transaction>> {
    if !path.exists() {
        return Err(BalanceError::NotFound {
            entity_type: "Transaction file",
            identifier: path.display().to_string(),
        });
    }

    let records: Vec<TransactionRecord> = read_records(path)?;
    let transactions = validate_records(records)?;

    info!(path = %path.display(), count = transactions.len(), "Loaded transactions");
    Ok(transactions)
}

/// Load the raw adjustment records of a file
///
/// A missing file means there are no adjustments. Records are returned
/// unvalidated; the balance overlay decides what to do with bad rows.
pub fn load_adjustments(path: &Path) -> BalanceResult<Option<Vec<AdjustmentRecord>>> {
    if !path.exists() {
        debug!(path = %path.display(), "No adjustment file");
        return Ok(None);
    }

    let records: Vec<AdjustmentRecord> = read_records(path)?;
    info!(path = %path.display(), count = records.len(), "Loaded adjustments");
    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Money, TransactionKind};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    const LEDGER_CSV: &str = "\
Date,Amount,Type,AccountId,ToAccountId
2024-01-05,500,income,A,
2024-01-20,300.50,expense,A,
2024-01-25,200,transfer,A,B
";

    #[test]
    fn test_format_from_path() {
        assert_eq!(LedgerFormat::from_path(Path::new("ledger.JSON")), LedgerFormat::Json);
        assert_eq!(LedgerFormat::from_path(Path::new("ledger.csv")), LedgerFormat::Csv);
        assert_eq!(LedgerFormat::from_path(Path::new("ledger")), LedgerFormat::Csv);
    }

    #[test]
    fn test_load_csv_transactions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(&path, LEDGER_CSV).unwrap();

        let transactions = load_transactions(&path).unwrap();
        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(transactions[0].to_account_id, None);
        assert_eq!(transactions[1].amount, Money::from_cents(30_050));
        assert_eq!(transactions[2].kind, TransactionKind::Transfer);
        assert_eq!(transactions[2].to_account_id, Some(AccountId::new("B")));
    }

    #[test]
    fn test_csv_column_order_and_extra_columns() {
        let csv = "Type,Memo,Date,Amount,AccountId\nexpense,coffee,2024-02-01,3.20,A\n";
        let records: Vec<TransactionRecord> = parse_csv(csv.as_bytes()).unwrap();
        let transactions = validate_records(records).unwrap();
        assert_eq!(transactions[0].amount, Money::from_cents(320));
    }

    #[test]
    fn test_csv_missing_column_is_schema_error() {
        let csv = "Date,Type,AccountId\n2024-02-01,income,A\n";
        let records: Vec<TransactionRecord> = parse_csv(csv.as_bytes()).unwrap();
        let err = validate_records(records).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("Amount"));
    }

    #[test]
    fn test_csv_identifiers_are_kept_as_written() {
        let csv = "Date,Amount,Type,AccountId,ToAccountId\n\
                   2024-02-01,10,transfer,007,1e3\n\
                   2024-02-02,1.999,income,42,\n";
        let records: Vec<TransactionRecord> = parse_csv(csv.as_bytes()).unwrap();
        let transactions = validate_records(records).unwrap();

        assert_eq!(transactions[0].account_id, Some(AccountId::new("007")));
        assert_eq!(transactions[0].to_account_id, Some(AccountId::new("1e3")));
        assert_eq!(transactions[1].account_id, Some(AccountId::new("42")));
        assert_eq!(transactions[1].amount, Money::from_cents(200));
        assert_eq!(transactions[1].to_account_id, None);
    }

    #[test]
    fn test_csv_adjustment_identifiers_are_kept_as_written() {
        let csv = "YearMonth,AccountId,AdjustedBalance\n2024-02,0012,950\n";
        let records: Vec<AdjustmentRecord> = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].account_id.as_deref(), Some("0012"));
    }

    #[test]
    fn test_csv_bad_cell_reports_row() {
        let csv = "Date,Amount,Type,AccountId\n2024-02-01,10,income,A\n2024-02-02,ten,income,A\n";
        let err = parse_csv::<TransactionRecord, _>(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_load_json_transactions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        fs::write(
            &path,
            r#"[
                {"date": "2024-01-05", "amount": 500, "type": "income", "accountId": 1},
                {"date": "2024-01-25", "amount": 200, "type": "transfer", "accountId": 1, "toAccountId": 2}
            ]"#,
        )
        .unwrap();

        let transactions = load_transactions(&path).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].to_account_id, Some(AccountId::new("2")));
    }

    #[test]
    fn test_missing_ledger_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_transactions(&temp_dir.path().join("nope.csv")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_adjustments_file_means_none() {
        let temp_dir = TempDir::new().unwrap();
        let adjustments = load_adjustments(&temp_dir.path().join("adjustments.csv")).unwrap();
        assert!(adjustments.is_none());
    }

    #[test]
    fn test_load_adjustments_keeps_incomplete_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adjustments.csv");
        fs::write(&path, "YearMonth,AccountId,AdjustedBalance\n2024-02,A,950\n2024-03,A,\n").unwrap();

        let records = load_adjustments(&path).unwrap().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].adjusted_balance, Some(Money::from_units(950)));
        assert_eq!(records[1].adjusted_balance, None);
    }
}
