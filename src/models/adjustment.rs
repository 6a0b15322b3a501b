//! Manual balance adjustments
//!
//! An adjustment is an authoritative closing balance for one account and one
//! month, entered by the user to reconcile the computed value with a bank
//! statement.

use serde::{Deserialize, Serialize};

use super::ids::AccountId;
use super::money::Money;
use super::period::MonthKey;
use super::transaction::{non_empty, optional_identifier};
use crate::error::{BalanceError, BalanceResult};

/// A validated override of a computed monthly balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub month: MonthKey,
    pub account_id: AccountId,
    pub adjusted_balance: Money,
}

impl BalanceAdjustment {
    pub fn new(month: MonthKey, account_id: AccountId, adjusted_balance: Money) -> Self {
        Self {
            month,
            account_id,
            adjusted_balance,
        }
    }
}

/// An adjustment row as read from a file, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentRecord {
    #[serde(rename = "YearMonth", alias = "yearMonth", alias = "year_month")]
    pub year_month: Option<String>,

    #[serde(
        rename = "AccountId",
        alias = "accountId",
        alias = "account_id",
        deserialize_with = "optional_identifier"
    )]
    pub account_id: Option<String>,

    #[serde(
        rename = "AdjustedBalance",
        alias = "adjustedBalance",
        alias = "adjusted_balance"
    )]
    pub adjusted_balance: Option<Money>,
}

impl AdjustmentRecord {
    pub fn new(year_month: &str, account_id: &str, adjusted_balance: Money) -> Self {
        Self {
            year_month: Some(year_month.to_string()),
            account_id: Some(account_id.to_string()),
            adjusted_balance: Some(adjusted_balance),
        }
    }

    /// Validate this record, `row` being its 1-based position for messages
    pub fn validate(self, row: usize) -> BalanceResult<BalanceAdjustment> {
        let missing = |field| BalanceError::missing_field("Adjustment", field, row);

        let month = non_empty(self.year_month).ok_or_else(|| missing("YearMonth"))?;
        let account_id = non_empty(self.account_id).ok_or_else(|| missing("AccountId"))?;
        let adjusted_balance = self
            .adjusted_balance
            .ok_or_else(|| missing("AdjustedBalance"))?;

        let month = MonthKey::parse(&month)
            .map_err(|e| BalanceError::Schema(format!("Adjustment row {}: {}", row, e)))?;

        Ok(BalanceAdjustment {
            month,
            account_id: AccountId::new(account_id),
            adjusted_balance,
        })
    }
}

/// Validate a whole adjustment source, stopping at the first bad row
pub fn validate_adjustments(records: &[AdjustmentRecord]) -> BalanceResult<Vec<BalanceAdjustment>> {
    records
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, record)| record.validate(index + 1))
        .collect()
}
