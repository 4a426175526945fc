//! Storage boundary. The core never persists anything itself; callers hand it
//! a store and re-run the pipeline after every write.

use std::sync::Mutex;

use crate::error::{CoreError, Result};
use crate::transaction::{HouseholdId, Transaction};

pub trait TransactionStore {
    /// All transactions of one household.
    fn fetch(&self, household: &HouseholdId) -> Result<Vec<Transaction>>;

    /// Persist new transactions, returning them with ids assigned.
    fn insert(&self, household: &HouseholdId, txns: &[Transaction]) -> Result<Vec<Transaction>>;

    /// Single-field category update scoped to one transaction id.
    fn update_category(&self, household: &HouseholdId, id: &str, category: &str) -> Result<()>;
}

/// In-process store; last write wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    rows: Vec<Transaction>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| CoreError::Store("memory store lock poisoned".to_string()))
    }
}

impl TransactionStore for MemoryStore {
    fn fetch(&self, household: &HouseholdId) -> Result<Vec<Transaction>> {
        let inner = self.lock()?;
        Ok(inner
            .rows
            .iter()
            .filter(|t| t.belongs_to(household))
            .cloned()
            .collect())
    }

    fn insert(&self, household: &HouseholdId, txns: &[Transaction]) -> Result<Vec<Transaction>> {
        if let Some(t) = txns.iter().find(|t| !t.belongs_to(household)) {
            return Err(CoreError::ForeignHousehold {
                expected: household.to_string(),
                found: t.household.to_string(),
            });
        }
        let mut inner = self.lock()?;
        let mut out = Vec::with_capacity(txns.len());
        for t in txns {
            inner.next_id += 1;
            let stored = t.clone().with_id(inner.next_id.to_string());
            inner.rows.push(stored.clone());
            out.push(stored);
        }
        Ok(out)
    }

    fn update_category(&self, household: &HouseholdId, id: &str, category: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let row = inner
            .rows
            .iter_mut()
            .find(|t| t.belongs_to(household) && t.id.as_deref() == Some(id))
            .ok_or_else(|| CoreError::UnknownTransaction(id.to_string()))?;
        row.category = category.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;
    use chrono::NaiveDate;

    fn txn(h: &str) -> Transaction {
        let d = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        Transaction::new(h.into(), d, 10.0, Kind::Purchase, "Otros", "x").unwrap()
    }

    #[test]
    fn test_insert_assigns_ids_and_partitions() {
        let store = MemoryStore::new();
        let a: HouseholdId = "a".into();
        let b: HouseholdId = "b".into();
        let saved = store.insert(&a, &[txn("a"), txn("a")]).unwrap();
        store.insert(&b, &[txn("b")]).unwrap();
        assert_eq!(saved[0].id.as_deref(), Some("1"));
        assert_eq!(store.fetch(&a).unwrap().len(), 2);
        assert_eq!(store.fetch(&b).unwrap().len(), 1);
    }

    #[test]
    fn test_insert_rejects_foreign_household() {
        let store = MemoryStore::new();
        let a: HouseholdId = "a".into();
        let err = store.insert(&a, &[txn("a"), txn("b")]).unwrap_err();
        assert!(matches!(err, CoreError::ForeignHousehold { .. }));
        assert!(store.fetch(&a).unwrap().is_empty());
        assert_eq!(store.insert(&a, &[txn("a")]).unwrap()[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_update_category_is_scoped() {
        let store = MemoryStore::new();
        let a: HouseholdId = "a".into();
        store.insert(&a, &[txn("a")]).unwrap();
        store.update_category(&a, "1", "Salud").unwrap();
        assert_eq!(store.fetch(&a).unwrap()[0].category, "Salud");
        assert!(store.update_category(&"b".into(), "1", "Salud").is_err());
    }
}
