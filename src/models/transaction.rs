//! Transaction model
//!
//! Ledger rows are read as loosely typed `TransactionRecord`s (every field
//! optional, exactly as found in a CSV or JSON file) and converted into
//! validated `Transaction`s before any balance is computed.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::date::parse_date;
use super::ids::AccountId;
use super::money::Money;
use crate::error::{BalanceError, BalanceResult};

/// Kind of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money entering the account
    Income,
    /// Money leaving the account
    Expense,
    /// Money moving from one account to another
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            other => Err(BalanceError::Schema(format!(
                "transaction type must be income, expense or transfer, got '{}'",
                other
            ))),
        }
    }
}

/// A validated ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,

    /// Amount as written in the ledger; the kind decides its sign
    pub amount: Money,

    pub kind: TransactionKind,

    /// Source account (the account affected by incomes and expenses)
    pub account_id: Option<AccountId>,

    /// Destination account of a transfer
    pub to_account_id: Option<AccountId>,
}

impl Transaction {
    pub fn income(date: NaiveDate, amount: Money, account_id: Option<AccountId>) -> Self {
        Self {
            date,
            amount,
            kind: TransactionKind::Income,
            account_id,
            to_account_id: None,
        }
    }

    pub fn expense(date: NaiveDate, amount: Money, account_id: Option<AccountId>) -> Self {
        Self {
            date,
            amount,
            kind: TransactionKind::Expense,
            account_id,
            to_account_id: None,
        }
    }

    pub fn transfer(date: NaiveDate, amount: Money, from: AccountId, to: AccountId) -> Self {
        Self {
            date,
            amount,
            kind: TransactionKind::Transfer,
            account_id: Some(from),
            to_account_id: Some(to),
        }
    }

    pub fn is_transfer(&self) -> bool {
        self.kind == TransactionKind::Transfer
    }

    /// Check if the account is the source or the destination
    pub fn touches(&self, account: &AccountId) -> bool {
        self.account_id.as_ref() == Some(account) || self.to_account_id.as_ref() == Some(account)
    }

    /// Signed effect of this transaction on a balance
    ///
    /// With an account, incomes and expenses count when the account is the
    /// source, and transfers count out of the source and into the
    /// destination. Without an account (consolidated view) transfers are
    /// internal moves and net to zero.
    pub fn effect_on(&self, account: Option<&AccountId>) -> Money {
        let is_source = |a: &AccountId| self.account_id.as_ref() == Some(a);
        let is_destination = |a: &AccountId| self.to_account_id.as_ref() == Some(a);

        match (self.kind, account) {
            (TransactionKind::Income, None) => self.amount,
            (TransactionKind::Expense, None) => -self.amount,
            (TransactionKind::Transfer, None) => Money::zero(),
            (TransactionKind::Income, Some(a)) if is_source(a) => self.amount,
            (TransactionKind::Expense, Some(a)) if is_source(a) => -self.amount,
            (TransactionKind::Transfer, Some(a)) => {
                let mut effect = Money::zero();
                if is_source(a) {
                    effect -= self.amount;
                }
                if is_destination(a) {
                    effect += self.amount;
                }
                effect
            }
            _ => Money::zero(),
        }
    }
}

/// A ledger row as read from a file, before validation
///
/// Field names follow the ledger column headers (`Date`, `Amount`, `Type`,
/// `AccountId`, `ToAccountId`); lower/camel-case spellings are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    #[serde(rename = "Date", alias = "date")]
    pub date: Option<String>,

    #[serde(rename = "Amount", alias = "amount")]
    pub amount: Option<Money>,

    #[serde(rename = "Type", alias = "type")]
    pub kind: Option<String>,

    #[serde(
        rename = "AccountId",
        alias = "accountId",
        alias = "account_id",
        deserialize_with = "optional_identifier"
    )]
    pub account_id: Option<String>,

    #[serde(
        rename = "ToAccountId",
        alias = "toAccountId",
        alias = "to_account_id",
        deserialize_with = "optional_identifier"
    )]
    pub to_account_id: Option<String>,
}

impl TransactionRecord {
    /// Validate this record, `row` being its 1-based position for messages
    pub fn validate(self, row: usize) -> BalanceResult<Transaction> {
        let missing = |field| BalanceError::missing_field("Transaction", field, row);

        let date = non_empty(self.date).ok_or_else(|| missing("Date"))?;
        let amount = self.amount.ok_or_else(|| missing("Amount"))?;
        let kind: TransactionKind = non_empty(self.kind)
            .ok_or_else(|| missing("Type"))?
            .parse()?;

        let date = parse_date(&date)?;
        let account_id = non_empty(self.account_id).map(AccountId::new);
        let to_account_id = non_empty(self.to_account_id).map(AccountId::new);

        if kind == TransactionKind::Transfer {
            if account_id.is_none() {
                return Err(missing("AccountId"));
            }
            if to_account_id.is_none() {
                return Err(missing("ToAccountId"));
            }
        }

        Ok(Transaction {
            date,
            amount,
            kind,
            account_id,
            to_account_id,
        })
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = BalanceError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        record.validate(1)
    }
}

/// Validate a whole ledger, stopping at the first bad row
pub fn validate_records(records: Vec<TransactionRecord>) -> BalanceResult<Vec<Transaction>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.validate(index + 1))
        .collect()
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Account identifiers may be written as strings or as bare numbers
pub(crate) fn optional_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Identifier {
        Integer(i64),
        Text(String),
    }

    Ok(Option::<Identifier>::deserialize(deserializer)?.map(|id| match id {
        Identifier::Integer(n) => n.to_string(),
        Identifier::Text(s) => s,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: &str, amount: i64, kind: &str) -> TransactionRecord {
        TransactionRecord {
            date: Some(date.to_string()),
            amount: Some(Money::from_units(amount)),
            kind: Some(kind.to_string()),
            account_id: Some("A".to_string()),
            to_account_id: None,
        }
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!("expense".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert_eq!(" TRANSFER ".parse::<TransactionKind>().unwrap(), TransactionKind::Transfer);
        assert!("refund".parse::<TransactionKind>().unwrap_err().is_schema());
    }

    #[test]
    fn test_validate_record() {
        let txn = record("2024-01-10", 500, "income").validate(1).unwrap();
        assert_eq!(txn.date, date(2024, 1, 10));
        assert_eq!(txn.amount, Money::from_units(500));
        assert_eq!(txn.kind, TransactionKind::Income);
        assert_eq!(txn.account_id, Some(AccountId::new("A")));
    }

    #[test]
    fn test_missing_fields_are_schema_errors() {
        let mut missing_amount = record("2024-01-10", 1, "income");
        missing_amount.amount = None;
        let err = missing_amount.validate(4).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("row 4"));
        assert!(err.to_string().contains("Amount"));

        let mut blank_date = record("2024-01-10", 1, "income");
        blank_date.date = Some("  ".to_string());
        assert!(blank_date.validate(1).unwrap_err().is_schema());

        let mut no_type = record("2024-01-10", 1, "income");
        no_type.kind = None;
        assert!(no_type.validate(1).unwrap_err().is_schema());
    }

    #[test]
    fn test_transfer_requires_both_accounts() {
        let transfer = record("2024-01-10", 200, "transfer");
        let err = transfer.validate(2).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("ToAccountId"));
    }

    #[test]
    fn test_unparseable_date_is_invalid_argument() {
        let err = record("31/31/2024", 1, "expense").validate(1).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_try_from() {
        let txn = Transaction::try_from(record("2024-02-01", 3, "expense")).unwrap();
        assert_eq!(txn.kind, TransactionKind::Expense);
    }

    #[test]
    fn test_validate_records_reports_row() {
        let mut bad = record("2024-01-02", 1, "income");
        bad.kind = None;
        let err = validate_records(vec![record("2024-01-01", 1, "income"), bad]).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_effect_of_income_and_expense() {
        let a = AccountId::new("A");
        let b = AccountId::new("B");
        let income = Transaction::income(date(2024, 1, 1), Money::from_units(500), Some(a.clone()));
        let expense = Transaction::expense(date(2024, 1, 1), Money::from_units(300), Some(a.clone()));

        assert_eq!(income.effect_on(Some(&a)), Money::from_units(500));
        assert_eq!(expense.effect_on(Some(&a)), Money::from_units(-300));
        assert_eq!(income.effect_on(Some(&b)), Money::zero());
        assert_eq!(income.effect_on(None), Money::from_units(500));
        assert_eq!(expense.effect_on(None), Money::from_units(-300));
    }

    #[test]
    fn test_effect_of_transfer() {
        let a = AccountId::new("A");
        let b = AccountId::new("B");
        let c = AccountId::new("C");
        let transfer = Transaction::transfer(date(2024, 1, 1), Money::from_units(200), a.clone(), b.clone());

        assert_eq!(transfer.effect_on(Some(&a)), Money::from_units(-200));
        assert_eq!(transfer.effect_on(Some(&b)), Money::from_units(200));
        assert_eq!(transfer.effect_on(Some(&c)), Money::zero());
        assert_eq!(transfer.effect_on(None), Money::zero());
        assert!(transfer.touches(&a) && transfer.touches(&b) && !transfer.touches(&c));
    }

    #[test]
    fn test_record_from_json() {
        let json = r#"{"date": "2024-01-10", "amount": 12.5, "type": "expense", "accountId": "7"}"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        let txn = record.validate(1).unwrap();
        assert_eq!(txn.amount, Money::from_cents(1250));
        assert_eq!(txn.account_id, Some(AccountId::new("7")));
    }

    #[test]
    fn test_record_with_numeric_account_ids() {
        let json = r#"{"Date": "2024-01-10", "Amount": "200", "Type": "transfer", "AccountId": 1, "ToAccountId": 2}"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        let txn = record.validate(1).unwrap();
        assert_eq!(txn.account_id, Some(AccountId::new("1")));
        assert_eq!(txn.to_account_id, Some(AccountId::new("2")));
    }
}
