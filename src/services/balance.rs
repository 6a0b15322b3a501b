//! Monthly balance accumulation
//!
//! Walks the periods from an account's creation date up to an end date,
//! sums the signed effect of the transactions falling in each period and
//! carries the running balance forward. Manual adjustments can then be laid
//! over the result.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{BalanceError, BalanceResult};
use crate::models::adjustment::validate_adjustments;
use crate::models::{
    AccountId, AdjustmentRecord, Money, MonthKey, MonthlyBalances, PeriodBalance, Transaction,
    TransactionKind,
};
use crate::storage::MonthlyBalanceCache;

use super::period::PeriodResolver;

/// Account metadata and bounds of a balance computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRequest {
    /// First day the account exists; the walk starts here
    pub creation_date: NaiveDate,
    pub initial_balance: Money,
    pub resolver: PeriodResolver,
    /// Last date whose period is included
    pub end_date: NaiveDate,
    /// Restrict to one account; `None` gives the consolidated view
    pub account_id: Option<AccountId>,
}

impl BalanceRequest {
    /// Consolidated request over all accounts
    pub fn new(
        creation_date: NaiveDate,
        initial_balance: Money,
        resolver: PeriodResolver,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            creation_date,
            initial_balance,
            resolver,
            end_date,
            account_id: None,
        }
    }

    /// Restrict the request to one account
    pub fn for_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Change the end date
    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }
}

/// Compute the per-period breakdown of the running balance
///
/// Returns one row per period traversed, in chronological order. The first
/// period is the one containing the creation date; transactions dated inside
/// it but before the creation date still count.
///
/// When an account is selected and an adjustment source is given, the
/// adjustments matching that account replace the closing balance of their
/// row. The running balance carried into later rows is left unadjusted. A
/// malformed adjustment source is reported as a warning and the unadjusted
/// rows are returned.
pub fn statement(
    transactions: &[Transaction],
    request: &BalanceRequest,
    adjustments: Option<&[AdjustmentRecord]>,
) -> BalanceResult<Vec<PeriodBalance>> {
    let account = request.account_id.as_ref();
    let mut balance = request.initial_balance;
    let mut rows = Vec::new();

    for period in request
        .resolver
        .periods(request.creation_date, request.end_date)
    {
        let period = period?;
        let mut row = PeriodBalance {
            key: request.resolver.month_key_for(period.start),
            period,
            opening: balance,
            income: Money::zero(),
            expense: Money::zero(),
            transfers_in: Money::zero(),
            transfers_out: Money::zero(),
            closing: balance,
            is_adjusted: false,
        };

        let in_period = transactions
            .iter()
            .filter(|txn| period.contains(txn.date))
            .filter(|txn| account.map_or(true, |a| txn.touches(a)));

        for txn in in_period {
            let effect = txn.effect_on(account);
            match txn.kind {
                TransactionKind::Income => row.income += effect,
                TransactionKind::Expense => row.expense -= effect,
                TransactionKind::Transfer if effect.is_positive() => row.transfers_in += effect,
                TransactionKind::Transfer => row.transfers_out -= effect,
            }
            balance += effect;
        }

        row.closing = balance;
        rows.push(row);
    }

    if let (Some(account), Some(records)) = (account, adjustments) {
        apply_adjustments(&mut rows, account, records);
    }

    Ok(rows)
}

/// Compute the final balance of each period
///
/// Adjustments follow the same rules as [`statement`].
pub fn accumulate(
    transactions: &[Transaction],
    request: &BalanceRequest,
    adjustments: Option<&[AdjustmentRecord]>,
) -> BalanceResult<MonthlyBalances> {
    let rows = statement(transactions, request, adjustments)?;
    Ok(MonthlyBalances::from(rows.as_slice()))
}

/// Overlay adjustments on computed rows
///
/// Only months already present are replaced; the overlay never adds or
/// removes months.
fn apply_adjustments(rows: &mut [PeriodBalance], account: &AccountId, records: &[AdjustmentRecord]) {
    let adjustments = match validate_adjustments(records) {
        Ok(adjustments) => adjustments,
        Err(e) => {
            warn!(account = %account, "Ignoring balance adjustments: {}", e);
            return;
        }
    };

    for adjustment in adjustments.iter().filter(|a| &a.account_id == account) {
        match rows.iter_mut().find(|row| row.key == adjustment.month) {
            Some(row) => {
                row.closing = adjustment.adjusted_balance;
                row.is_adjusted = true;
                debug!(
                    account = %account,
                    month = %adjustment.month,
                    "Applied balance adjustment of {}",
                    adjustment.adjusted_balance
                );
            }
            None => debug!(
                account = %account,
                month = %adjustment.month,
                "Adjustment month is outside the computed range"
            ),
        }
    }
}

/// Service answering single-month balance queries through a cache
pub struct BalanceService<'a> {
    transactions: &'a [Transaction],
    request: BalanceRequest,
    adjustments: Option<&'a [AdjustmentRecord]>,
    cache: &'a MonthlyBalanceCache,
}

impl<'a> BalanceService<'a> {
    /// Create a new balance service
    pub fn new(
        transactions: &'a [Transaction],
        request: BalanceRequest,
        cache: &'a MonthlyBalanceCache,
    ) -> Self {
        Self {
            transactions,
            request,
            adjustments: None,
            cache,
        }
    }

    /// Apply adjustments when recomputing
    pub fn with_adjustments(mut self, adjustments: &'a [AdjustmentRecord]) -> Self {
        self.adjustments = Some(adjustments);
        self
    }

    pub fn request(&self) -> &BalanceRequest {
        &self.request
    }

    /// Recompute every month and refresh the cache
    pub fn monthly_balances(&self) -> BalanceResult<MonthlyBalances> {
        let balances = accumulate(self.transactions, &self.request, self.adjustments)?;
        self.cache.store_all(&balances);
        Ok(balances)
    }

    /// Get the balance of one month, recomputing on a cache miss
    pub fn balance_for(&self, key: &MonthKey) -> BalanceResult<Money> {
        if let Some(balance) = self.cache.get(key) {
            return Ok(balance);
        }

        debug!(month = %key, "Balance cache miss");
        self.monthly_balances()?
            .get(key)
            .ok_or_else(|| BalanceError::period_not_found(key.to_string()))
    }
}
