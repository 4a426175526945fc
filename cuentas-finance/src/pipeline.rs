//! Canonicalisation: raw and stored records become classified [`Transaction`]s
//! scoped to one household, then overlapping import sources are deduplicated.

use std::collections::HashMap;

use chrono::NaiveDate;
use cuentas_core::{CoreError, HouseholdId, Kind, RawRecord, Result, StoredRecord, Transaction};
use tracing::{debug, info};

use crate::category_rules::CategoryRules;

/// Classify one raw record into a canonical transaction of `household`.
pub fn canonicalize(raw: &RawRecord, household: &HouseholdId, rules: &CategoryRules) -> Result<Transaction> {
    if let Some(found) = &raw.household {
        if found != household {
            return Err(CoreError::ForeignHousehold {
                expected: household.to_string(),
                found: found.to_string(),
            });
        }
    }

    let date = raw
        .date
        .ok_or_else(|| CoreError::InvalidRecord("missing date".to_string()))?;
    if !raw.amount.is_finite() || raw.amount == 0.0 {
        return Err(CoreError::InvalidRecord(format!("unusable amount {}", raw.amount)));
    }

    let kind = raw
        .kind
        .unwrap_or_else(|| Kind::from_hint(&raw.type_hint, Some(raw.amount)));
    let category = rules.categorize(&raw.detail, kind, raw.category_hint());

    let mut txn = Transaction::new(household.clone(), date, raw.amount.abs(), kind, category, raw.detail.as_str())?
        .with_owner(raw.owner.trim())
        .with_bank(raw.bank.trim(), raw.product.trim());
    txn.product_number = raw.product_number.trim().to_string();
    if let Some(id) = raw.id.as_deref().filter(|id| !id.is_empty()) {
        txn = txn.with_id(id);
    }
    Ok(txn)
}

/// Manual entry goes through the same path as imported rows.
#[allow(clippy::too_many_arguments)]
pub fn new_manual(
    household: &HouseholdId,
    date: NaiveDate,
    amount: f64,
    type_hint: &str,
    detail: &str,
    category: Option<&str>,
    owner: &str,
    rules: &CategoryRules,
) -> Result<Transaction> {
    let mut raw = RawRecord::manual(date, amount, type_hint, detail).with_owner(owner);
    if let Some(c) = category {
        raw = raw.with_category(c);
    }
    canonicalize(&raw, household, rules)
}

/// Record read from storage or a legacy export.
pub fn canonicalize_stored(record: StoredRecord, household: &HouseholdId, rules: &CategoryRules) -> Result<Transaction> {
    canonicalize(&record.into_raw()?, household, rules)
}

/// A record the pipeline refused, by position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub index: usize,
    pub error: CoreError,
}

#[derive(Debug, Clone, Default)]
pub struct CanonicalBatch {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<Rejection>,
}

pub fn canonicalize_batch(records: &[RawRecord], household: &HouseholdId, rules: &CategoryRules) -> CanonicalBatch {
    let mut batch = CanonicalBatch::default();
    for (index, raw) in records.iter().enumerate() {
        match canonicalize(raw, household, rules) {
            Ok(txn) => batch.transactions.push(txn),
            Err(error) => {
                debug!(index, %error, "record rejected by pipeline");
                batch.rejected.push(Rejection { index, error });
            }
        }
    }
    info!(
        household = %household,
        accepted = batch.transactions.len(),
        rejected = batch.rejected.len(),
        "records canonicalised"
    );
    batch
}

/// Identity used to spot the same movement imported twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub date: NaiveDate,
    /// Amount in cents
    pub cents: i64,
    pub detail: String,
    pub owner: String,
}

impl DuplicateKey {
    pub fn of(txn: &Transaction) -> Self {
        Self {
            date: txn.date,
            cents: (txn.amount * 100.0).round() as i64,
            detail: txn.detail.trim().to_string(),
            owner: txn.owner.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub key: DuplicateKey,
    /// Positions in the input, first occurrence first
    pub indices: Vec<usize>,
}

/// Groups of two or more transactions sharing a [`DuplicateKey`], in order of
/// first occurrence.
pub fn find_duplicates(txns: &[Transaction]) -> Vec<DuplicateGroup> {
    let mut slot: HashMap<DuplicateKey, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for (i, txn) in txns.iter().enumerate() {
        let key = DuplicateKey::of(txn);
        match slot.get(&key) {
            Some(&g) => groups[g].indices.push(i),
            None => {
                slot.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup { key, indices: vec![i] });
            }
        }
    }
    groups.retain(|g| g.indices.len() > 1);
    groups
}

/// Keep the first transaction of every duplicate group.
pub fn dedup(txns: Vec<Transaction>) -> Vec<Transaction> {
    let before = txns.len();
    let mut seen = std::collections::HashSet::new();
    let kept: Vec<Transaction> = txns
        .into_iter()
        .filter(|t| seen.insert(DuplicateKey::of(t)))
        .collect();
    if kept.len() < before {
        debug!(dropped = before - kept.len(), "duplicate transactions dropped");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn household() -> HouseholdId {
        HouseholdId::new("fam-1")
    }

    #[test]
    fn test_canonical_amount_is_magnitude() {
        let rules = CategoryRules::builtin();
        let raw = RawRecord::manual(day(5), -45_900.0, "Compra", "CARULLA CALLE 140");
        let txn = canonicalize(&raw, &household(), &rules).unwrap();
        assert_eq!(txn.amount, 45_900.0);
        assert_eq!(txn.kind, Kind::Purchase);
        assert_eq!(txn.category, "Alimentación");
        assert_eq!(txn.household, household());
    }

    #[test]
    fn test_sign_decides_unknown_type() {
        let rules = CategoryRules::builtin();
        let refund = RawRecord::manual(day(5), 30_000.0, "", "REINTEGRO");
        assert_eq!(canonicalize(&refund, &household(), &rules).unwrap().kind, Kind::Income);
        let charge = RawRecord::manual(day(5), -30_000.0, "", "CARGO");
        assert_eq!(canonicalize(&charge, &household(), &rules).unwrap().kind, Kind::Expense);
    }

    #[test]
    fn test_rejects_zero_and_foreign() {
        let rules = CategoryRules::builtin();
        let zero = RawRecord::manual(day(5), 0.0, "Compra", "X");
        assert!(matches!(
            canonicalize(&zero, &household(), &rules),
            Err(CoreError::InvalidRecord(_))
        ));

        let mut foreign = RawRecord::manual(day(5), 10.0, "Compra", "X");
        foreign.household = Some(HouseholdId::new("fam-2"));
        assert!(matches!(
            canonicalize(&foreign, &household(), &rules),
            Err(CoreError::ForeignHousehold { .. })
        ));
    }

    #[test]
    fn test_stored_record_keeps_id_and_kind() {
        let rules = CategoryRules::builtin();
        let stored: StoredRecord = serde_json::from_str(
            r#"{"id": 42, "fecha": "2026-01-03", "tipo": "Abono", "valor": 1200000,
                "detalle": "PAGO TC", "family_id": "fam-1"}"#,
        )
        .unwrap();
        let txn = canonicalize_stored(stored, &household(), &rules).unwrap();
        assert_eq!(txn.id.as_deref(), Some("42"));
        assert_eq!(txn.kind, Kind::CreditCardPayment);
    }

    #[test]
    fn test_batch_reports_rejections() {
        let rules = CategoryRules::builtin();
        let records = vec![
            RawRecord::manual(day(1), -10.0, "Compra", "A"),
            RawRecord { date: None, amount: -5.0, ..RawRecord::default() },
            RawRecord::manual(day(2), 20.0, "Depósito", "B"),
        ];
        let batch = canonicalize_batch(&records, &household(), &rules);
        assert_eq!(batch.transactions.len(), 2);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].index, 1);
        assert!(batch.transactions.iter().all(|t| t.amount >= 0.0));
    }

    #[test]
    fn test_manual_entry() {
        let rules = CategoryRules::builtin();
        let txn = new_manual(&household(), day(9), 15_000.0, "Compra", "Tienda", Some("Mascotas"), "m1", &rules).unwrap();
        assert_eq!(txn.category, "Mascotas");
        assert_eq!(txn.owner, "m1");
    }

    #[test]
    fn test_uncategorised_sample_through_kpis() {
        let rules = CategoryRules::builtin();
        let h = household();
        let txns = vec![
            new_manual(&h, day(2), 50_000.0, "expense", "EXITO Supermercado", None, "", &rules).unwrap(),
            new_manual(&h, day(3), 30_000.0, "expense", "Netflix", None, "", &rules).unwrap(),
            new_manual(&h, day(1), 2_000_000.0, "income", "", None, "", &rules).unwrap(),
        ];
        assert_eq!(txns[1].category, "Suscripciones");
        assert_eq!(txns[2].category, "Ingreso");

        let kpis = crate::aggregation::compute_kpis(&txns, false);
        assert_eq!(kpis.income, 2_000_000.0);
        assert_eq!(kpis.expenses, 80_000.0);
        assert_eq!(kpis.balance, 1_920_000.0);
        assert_eq!(kpis.savings_rate, 96.0);
        assert_eq!(kpis.dominant_category.as_deref(), Some("Alimentación"));
    }

    #[test]
    fn test_find_duplicates_and_dedup() {
        let rules = CategoryRules::builtin();
        let a = new_manual(&household(), day(1), 10_000.0, "Compra", "EXITO", None, "m1", &rules).unwrap();
        let b = new_manual(&household(), day(1), 10_000.0, "Compra", "EXITO ", None, "m1", &rules).unwrap();
        let c = new_manual(&household(), day(1), 10_000.0, "Compra", "EXITO", None, "m2", &rules).unwrap();
        let txns = vec![a.clone(), c.clone(), b.with_id("7")];

        let groups = find_duplicates(&txns);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].indices, vec![0, 2]);

        let kept = dedup(txns);
        assert_eq!(kept, vec![a, c]);
    }
}
