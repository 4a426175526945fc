use chrono::NaiveDate;
use cuentas_core::{HouseholdId, HouseholdMember, Kind};
use cuentas_finance::{
    AppState, CategoryRules, Period, Selection, canonicalize_batch, compute_kpis, dedup,
    filter_by_period, find_duplicates, recompute,
};
use cuentas_ingest::parsers::csv_sheet::parse_csv_file;
use cuentas_ingest::{ImportOptions, RejectReason};
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("movimientos.csv")
}

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

fn members() -> Vec<HouseholdMember> {
    vec![HouseholdMember::new("m1", "Sebastian"), HouseholdMember::new("m2", "Laura")]
}

fn load() -> AppState {
    let household = HouseholdId::new("fam-1");
    let batch = parse_csv_file(fixture_path(), &ImportOptions::default()).expect("fixture parses");
    let canonical = canonicalize_batch(&batch.records, &household, &CategoryRules::builtin());
    assert!(canonical.rejected.is_empty());

    let mut state = AppState::new(household).with_members(members());
    state.transactions = dedup(canonical.transactions);
    state
}

#[test]
fn test_import_rejects_unusable_rows() {
    let batch = parse_csv_file(fixture_path(), &ImportOptions::default()).unwrap();
    assert_eq!(batch.records.len(), 8);
    assert_eq!(batch.rejected_count(), 2);
    assert!(matches!(batch.rejected[0].reason, RejectReason::InvalidDate(_)));
    assert_eq!(batch.rejected[1].reason, RejectReason::ZeroAmount);
}

#[test]
fn test_classification_from_csv() {
    let batch = parse_csv_file(fixture_path(), &ImportOptions::default()).unwrap();
    let canonical = canonicalize_batch(&batch.records, &HouseholdId::new("fam-1"), &CategoryRules::builtin());
    let txns = canonical.transactions;

    assert!(txns.iter().all(|t| t.amount >= 0.0));
    assert_eq!(txns[0].kind, Kind::Deposit);
    assert_eq!(txns[0].category, "Ingreso");
    assert_eq!(txns[1].category, "Alimentación");
    assert_eq!(txns[2].category, "Suscripciones");
    assert_eq!(txns[3].kind, Kind::CreditCardPayment);
    assert_eq!(txns[4].kind, Kind::Interest);
    assert!((txns[4].amount - 1234.56).abs() < 1e-9);
    assert_eq!(txns[6].category, "Transporte");
    assert_eq!(txns[7].category, "Salud familia");

    let groups = find_duplicates(&txns);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].indices, vec![2, 5]);
}

#[test]
fn test_month_kpis_without_card_payments() {
    let state = load();
    assert_eq!(state.transactions.len(), 7);

    let month = filter_by_period(
        &state.transactions,
        &state.household,
        &Selection::new(Period::Month),
        reference(),
        &state.members,
    );
    assert_eq!(month.len(), 6);

    let kpis = compute_kpis(&month, false);
    assert!((kpis.income - 2_001_234.56).abs() < 1e-6);
    assert_eq!(kpis.expenses, 125_900.0);
    assert_eq!(kpis.dominant_category.as_deref(), Some("Alimentación"));
    assert_eq!(kpis.expense_count, 3);

    let with_cards = compute_kpis(&month, true);
    assert_eq!(with_cards.expenses, 1_325_900.0);
    assert!((with_cards.income - kpis.income).abs() < 1e-9);
}

#[test]
fn test_member_view_includes_legacy_names() {
    let mut state = load();
    state.selection = Selection::new(Period::Month).with_members(["m2"]);

    let view = recompute(&state, reference());
    assert_eq!(view.kpis.expenses, 75_900.0);
    assert_eq!(view.kpis.income, 0.0);
    assert_eq!(view.expenses.len(), 2);
    assert_eq!(view.members.len(), 1);
    assert_eq!(view.members[0].member.id, "m2");
    assert_eq!(view.available_years, vec![2026, 2025]);
}
