//! Month forecast
//!
//! Summarizes one target period: the balance carried into it, its income
//! and expense totals and the balance it ends with.

use serde::Serialize;

use crate::error::{BalanceError, BalanceResult};
use crate::models::{AdjustmentRecord, Money, MonthKey, MonthMode, Period, Transaction};

use super::balance::{statement, BalanceRequest};

/// Summary of one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub key: MonthKey,
    pub period: Period,
    pub mode: MonthMode,
    /// Balance carried in from the previous periods
    pub initial_balance: Money,
    pub incomes: Money,
    /// Expense total, as a positive amount
    pub expenses: Money,
    /// Transfers in minus transfers out
    pub transfers_net: Money,
    pub final_balance: Money,
    /// Final balance comes from a manual adjustment
    pub is_adjusted: bool,
}

/// Build the forecast of the period keyed `key`
///
/// The request's end date is ignored; the walk stops at the target period.
/// With adjustments, the initial balance is the previous month's adjusted
/// balance when there is one, and an adjustment of the target month replaces
/// the final balance.
pub fn forecast_for_month(
    transactions: &[Transaction],
    request: &BalanceRequest,
    key: MonthKey,
    adjustments: Option<&[AdjustmentRecord]>,
) -> BalanceResult<Forecast> {
    let period = request.resolver.period_for_month(key)?;
    let rows = statement(transactions, &request.clone().until(period.end), adjustments)?;

    let index = rows
        .iter()
        .position(|row| row.key == key)
        .ok_or_else(|| BalanceError::period_not_found(key.to_string()))?;
    let row = &rows[index];

    let initial_balance = match index.checked_sub(1) {
        Some(previous) => rows[previous].closing,
        None => row.opening,
    };
    let transfers_net = row.transfers_in - row.transfers_out;
    let final_balance = if row.is_adjusted {
        row.closing
    } else {
        initial_balance + row.income - row.expense + transfers_net
    };

    Ok(Forecast {
        key,
        period: row.period,
        mode: request.resolver.mode(),
        initial_balance,
        incomes: row.income,
        expenses: row.expense,
        transfers_net,
        final_balance,
        is_adjusted: row.is_adjusted,
    })
}
