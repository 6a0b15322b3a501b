//! In-memory cache of computed monthly balances

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{Money, MonthKey, MonthlyBalances};

/// Thread-safe store of month balances
///
/// Values are recomputations of the same inputs, so concurrent writers can
/// only ever store identical values and the last write wins.
#[derive(Debug, Default)]
pub struct MonthlyBalanceCache {
    balances: RwLock<BTreeMap<MonthKey, Money>>,
}

impl MonthlyBalanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &MonthKey) -> Option<Money> {
        self.read().get(key).copied()
    }

    pub fn set(&self, key: MonthKey, balance: Money) {
        self.write().insert(key, balance);
    }

    /// Store a whole recomputation under a single write lock
    pub fn store_all(&self, balances: &MonthlyBalances) {
        let mut guard = self.write();
        for (key, balance) in balances.iter() {
            guard.insert(*key, *balance);
        }
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of the cached values in month order
    pub fn snapshot(&self) -> Vec<(MonthKey, Money)> {
        self.read().iter().map(|(k, v)| (*k, *v)).collect()
    }

    // A poisoned lock still holds a complete map: every write is a plain insert
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<MonthKey, Money>> {
        self.balances.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<MonthKey, Money>> {
        self.balances.write().unwrap_or_else(PoisonError::into_inner)
    }
}
