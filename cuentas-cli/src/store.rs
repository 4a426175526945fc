//! Local JSON file store: one array of canonical transactions, rewritten whole
//! on every change.

use cuentas_core::{CoreError, HouseholdId, Result, Transaction, TransactionStore};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Transaction>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let s = fs::read_to_string(&self.path)
            .map_err(|e| CoreError::Store(format!("read {}: {e}", self.path.display())))?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&s).map_err(|e| CoreError::Store(format!("parse {}: {e}", self.path.display())))
    }

    fn write_all(&self, rows: &[Transaction]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| CoreError::Store(format!("create {}: {e}", dir.display())))?;
        }
        let json = serde_json::to_string_pretty(rows).map_err(|e| CoreError::Store(e.to_string()))?;
        // Replaced via a sibling temp file and rename.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| CoreError::Store(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|e| CoreError::Store(format!("replace {}: {e}", self.path.display())))
    }
}

impl TransactionStore for JsonFileStore {
    fn fetch(&self, household: &HouseholdId) -> Result<Vec<Transaction>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|t| t.belongs_to(household))
            .collect())
    }

    fn insert(&self, household: &HouseholdId, txns: &[Transaction]) -> Result<Vec<Transaction>> {
        if let Some(t) = txns.iter().find(|t| !t.belongs_to(household)) {
            return Err(CoreError::ForeignHousehold {
                expected: household.to_string(),
                found: t.household.to_string(),
            });
        }
        let mut rows = self.read_all()?;
        let mut next = rows
            .iter()
            .filter_map(|t| t.id.as_deref()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let inserted: Vec<Transaction> = txns
            .iter()
            .map(|t| {
                next += 1;
                t.clone().with_id(next.to_string())
            })
            .collect();
        rows.extend(inserted.iter().cloned());
        self.write_all(&rows)?;
        Ok(inserted)
    }

    fn update_category(&self, household: &HouseholdId, id: &str, category: &str) -> Result<()> {
        let mut rows = self.read_all()?;
        let row = rows
            .iter_mut()
            .find(|t| t.belongs_to(household) && t.id.as_deref() == Some(id))
            .ok_or_else(|| CoreError::UnknownTransaction(id.to_string()))?;
        row.category = category.to_string();
        self.write_all(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cuentas_core::Kind;

    fn txn(h: &str, detail: &str) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        Transaction::new(HouseholdId::new(h), date, 12_000.0, Kind::Purchase, "Otros", detail).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("movimientos.json"));
        assert!(store.fetch(&HouseholdId::new("fam-1")).unwrap().is_empty());
    }

    #[test]
    fn test_insert_fetch_update() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data").join("movimientos.json"));
        let h = HouseholdId::new("fam-1");

        let first = store.insert(&h, &[txn("fam-1", "A"), txn("fam-1", "B")]).unwrap();
        assert_eq!(first[1].id.as_deref(), Some("2"));
        let more = store.insert(&h, &[txn("fam-1", "C")]).unwrap();
        assert_eq!(more[0].id.as_deref(), Some("3"));

        store.update_category(&h, "2", "Mascotas").unwrap();
        let rows = store.fetch(&h).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].category, "Mascotas");

        assert!(matches!(
            store.update_category(&HouseholdId::new("fam-2"), "2", "X"),
            Err(CoreError::UnknownTransaction(_))
        ));
    }

    #[test]
    fn test_household_partition() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("movimientos.json"));
        assert!(store.insert(&HouseholdId::new("fam-1"), &[txn("fam-2", "X")]).is_err());
        store.insert(&HouseholdId::new("fam-2"), &[txn("fam-2", "X")]).unwrap();
        assert!(store.fetch(&HouseholdId::new("fam-1")).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movimientos.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(path);
        assert!(matches!(store.fetch(&HouseholdId::new("fam-1")), Err(CoreError::Store(_))));
    }
}
