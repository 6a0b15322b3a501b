//! Computed balance results

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::money::Money;
use super::period::{MonthKey, Period};

/// Per-period breakdown of a running balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodBalance {
    pub key: MonthKey,
    pub period: Period,
    /// Balance carried in from the previous period
    pub opening: Money,
    /// Sum of incomes
    pub income: Money,
    /// Sum of expenses, as a positive amount
    pub expense: Money,
    pub transfers_in: Money,
    pub transfers_out: Money,
    pub closing: Money,
    /// Closing balance comes from a manual adjustment
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_adjusted: bool,
}

impl PeriodBalance {
    /// Net movement over the period
    pub fn net(&self) -> Money {
        self.closing - self.opening
    }
}

/// Final balance of each traversed period, in chronological order
///
/// Entries are only ever appended in increasing period order, so insertion
/// order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyBalances {
    entries: Vec<(MonthKey, Money)>,
}

impl MonthlyBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the balance of a period, replacing any prior value for the key
    pub(crate) fn record(&mut self, key: MonthKey, balance: Money) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = balance,
            None => self.entries.push((key, balance)),
        }
    }

    pub fn get(&self, key: &MonthKey) -> Option<Money> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, balance)| *balance)
    }

    pub fn contains_key(&self, key: &MonthKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &MonthKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MonthKey, &Money)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Balance of the most recent period
    pub fn last(&self) -> Option<(MonthKey, Money)> {
        self.entries.last().copied()
    }
}

impl From<&[PeriodBalance]> for MonthlyBalances {
    fn from(rows: &[PeriodBalance]) -> Self {
        let mut balances = MonthlyBalances::new();
        for row in rows {
            balances.record(row.key, row.closing);
        }
        balances
    }
}

impl Serialize for MonthlyBalances {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, balance) in &self.entries {
            map.serialize_entry(key, balance)?;
        }
        map.end()
    }
}
