//! Aggregation engine: pure reductions over an already-filtered slice.
//!
//! Rankings sum first, then sort descending with a stable sort, so equal
//! totals keep the order in which their key was first seen.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, NaiveDate};
use cuentas_core::{HouseholdMember, ResolvedOwner, Transaction, resolve_owner};
use serde::Serialize;

/// Headline numbers for one filtered set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Kpis {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    /// Percent of income kept; 0 when there is no income
    pub savings_rate: f64,
    /// Percent of income spent; 0 when there is no income
    pub expense_percent: f64,
    /// Expenses per distinct day with spending
    pub daily_average: f64,
    pub dominant_category: Option<String>,
    pub dominant_percent: f64,
    pub max_day: Option<DayTotal>,
    pub income_count: usize,
    pub expense_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberTotal {
    pub member: ResolvedOwner,
    pub amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: YearMonth,
    pub amount: f64,
}

/// One point of the income/expense chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthPoint {
    pub month: YearMonth,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Most frequent expense detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merchant {
    pub detail: String,
    pub visits: usize,
    pub amount: f64,
}

fn expenses_of(txns: &[Transaction], include_card_payments: bool) -> impl Iterator<Item = &Transaction> {
    txns.iter().filter(move |t| t.counts_as_expense(include_card_payments))
}

/// Sum amounts per key keeping first-seen order, then stable-sort descending.
fn ranked<'a, K, F>(txns: impl Iterator<Item = &'a Transaction>, key: F) -> Vec<(K, f64, usize)>
where
    K: Eq + Hash + Clone,
    F: Fn(&Transaction) -> K,
{
    let mut slot: HashMap<K, usize> = HashMap::new();
    let mut rows: Vec<(K, f64, usize)> = Vec::new();
    for t in txns {
        let k = key(t);
        match slot.get(&k) {
            Some(&i) => {
                rows[i].1 += t.amount;
                rows[i].2 += 1;
            }
            None => {
                slot.insert(k.clone(), rows.len());
                rows.push((k, t.amount, 1));
            }
        }
    }
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part * 100.0 / whole } else { 0.0 }
}

pub fn compute_kpis(txns: &[Transaction], include_card_payments: bool) -> Kpis {
    let income: f64 = txns.iter().filter(|t| t.counts_as_income()).map(|t| t.amount).sum();
    let expenses: f64 = expenses_of(txns, include_card_payments).map(|t| t.amount).sum();
    let balance = income - expenses;

    let days = day_totals(txns, include_card_payments);
    let daily_average = if days.is_empty() { 0.0 } else { expenses / days.len() as f64 };

    let dominant = category_totals(txns, include_card_payments).into_iter().next();
    let dominant_percent = dominant.as_ref().map_or(0.0, |c| percent(c.amount, expenses));

    let income_count = txns.iter().filter(|t| t.counts_as_income()).count();
    let expense_count = expenses_of(txns, include_card_payments).count();

    Kpis {
        income,
        expenses,
        balance,
        savings_rate: percent(balance, income),
        expense_percent: percent(expenses, income),
        daily_average,
        dominant_category: dominant.map(|c| c.category),
        dominant_percent,
        max_day: days.first().copied(),
        income_count,
        expense_count,
        total_count: txns.len(),
    }
}

/// Expense totals per category, largest first.
pub fn category_totals(txns: &[Transaction], include_card_payments: bool) -> Vec<CategoryTotal> {
    ranked(expenses_of(txns, include_card_payments), |t| t.category.clone())
        .into_iter()
        .map(|(category, amount, count)| CategoryTotal { category, amount, count })
        .collect()
}

pub fn top_categories(txns: &[Transaction], include_card_payments: bool, n: usize) -> Vec<CategoryTotal> {
    let mut totals = category_totals(txns, include_card_payments);
    totals.truncate(n);
    totals
}

/// Expense totals per member, resolving legacy owner names to registry ids.
pub fn member_totals(txns: &[Transaction], members: &[HouseholdMember], include_card_payments: bool) -> Vec<MemberTotal> {
    // Spellings that fold to one placeholder show the first one seen.
    let mut by_id: HashMap<String, ResolvedOwner> = HashMap::new();
    for t in expenses_of(txns, include_card_payments) {
        let r = resolve_owner(&t.owner, members);
        by_id.entry(r.id.clone()).or_insert(r);
    }
    ranked(expenses_of(txns, include_card_payments), |t| resolve_owner(&t.owner, members).id)
        .into_iter()
        .filter_map(|(id, amount, count)| {
            let member = by_id.get(&id)?.clone();
            Some(MemberTotal { member, amount, count })
        })
        .collect()
}

/// Expense totals per day, largest first.
pub fn day_totals(txns: &[Transaction], include_card_payments: bool) -> Vec<DayTotal> {
    ranked(expenses_of(txns, include_card_payments), |t| t.date)
        .into_iter()
        .map(|(date, amount, _)| DayTotal { date, amount })
        .collect()
}

/// Expense totals per calendar month, largest first.
pub fn month_totals(txns: &[Transaction], include_card_payments: bool) -> Vec<MonthTotal> {
    ranked(expenses_of(txns, include_card_payments), |t| YearMonth::of(t.date))
        .into_iter()
        .map(|(month, amount, _)| MonthTotal { month, amount })
        .collect()
}

/// Income, expenses and balance per month, oldest first.
pub fn monthly_series(txns: &[Transaction], include_card_payments: bool) -> Vec<MonthPoint> {
    let mut points: Vec<MonthPoint> = Vec::new();
    let mut slot: HashMap<YearMonth, usize> = HashMap::new();
    for t in txns {
        let income = t.counts_as_income();
        let expense = t.counts_as_expense(include_card_payments);
        if !income && !expense {
            continue;
        }
        let month = YearMonth::of(t.date);
        let i = *slot.entry(month).or_insert_with(|| {
            points.push(MonthPoint { month, income: 0.0, expenses: 0.0, balance: 0.0 });
            points.len() - 1
        });
        if income {
            points[i].income += t.amount;
        } else {
            points[i].expenses += t.amount;
        }
    }
    for p in &mut points {
        p.balance = p.income - p.expenses;
    }
    points.sort_by_key(|p| p.month);
    points
}

/// Expense detail seen most often; ties go to the first seen.
pub fn top_merchant(txns: &[Transaction], include_card_payments: bool) -> Option<Merchant> {
    let mut visits: Vec<Merchant> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for t in expenses_of(txns, include_card_payments) {
        let detail = t.detail.trim();
        if detail.is_empty() {
            continue;
        }
        match slot.get(detail) {
            Some(&i) => {
                visits[i].visits += 1;
                visits[i].amount += t.amount;
            }
            None => {
                slot.insert(detail, visits.len());
                visits.push(Merchant { detail: detail.to_string(), visits: 1, amount: t.amount });
            }
        }
    }
    visits.sort_by(|a, b| b.visits.cmp(&a.visits));
    visits.into_iter().next()
}

/// Mean expense amount, 0 without expenses.
pub fn average_ticket(txns: &[Transaction], include_card_payments: bool) -> f64 {
    let (sum, n) = expenses_of(txns, include_card_payments).fold((0.0, 0usize), |(s, n), t| (s + t.amount, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuentas_core::{HouseholdId, Kind};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn txn(d: NaiveDate, amount: f64, kind: Kind, category: &str, detail: &str) -> Transaction {
        Transaction::new(HouseholdId::new("fam-1"), d, amount, kind, category, detail).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(date(1, 2), 50_000.0, Kind::Purchase, "Alimentación", "EXITO"),
            txn(date(1, 3), 30_000.0, Kind::Purchase, "Suscripciones", "Netflix"),
            txn(date(1, 1), 2_000_000.0, Kind::Deposit, "Ingreso", "NOMINA"),
        ]
    }

    #[test]
    fn test_sample_kpis() {
        let k = compute_kpis(&sample(), false);
        assert_eq!(k.income, 2_000_000.0);
        assert_eq!(k.expenses, 80_000.0);
        assert_eq!(k.balance, 1_920_000.0);
        assert_eq!(k.savings_rate, 96.0);
        assert_eq!(k.expense_percent, 4.0);
        assert_eq!(k.daily_average, 40_000.0);
        assert_eq!(k.dominant_category.as_deref(), Some("Alimentación"));
        assert_eq!(k.dominant_percent, 62.5);
        assert_eq!(k.max_day, Some(DayTotal { date: date(1, 2), amount: 50_000.0 }));
        assert_eq!((k.income_count, k.expense_count, k.total_count), (1, 2, 3));
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let k = compute_kpis(&[], true);
        assert_eq!(k, Kpis::default());
        assert_eq!(k.savings_rate, 0.0);
        assert!(monthly_series(&[], true).is_empty());
        assert_eq!(average_ticket(&[], true), 0.0);
        assert_eq!(top_merchant(&[], true), None);
    }

    #[test]
    fn test_card_payment_toggle() {
        let mut txns = sample();
        txns.push(txn(date(1, 4), 1_200_000.0, Kind::CreditCardPayment, "Otros", "PAGO TC"));

        let off = compute_kpis(&txns, false);
        assert_eq!(off.income, 2_000_000.0);
        assert_eq!(off.expenses, 80_000.0);

        let on = compute_kpis(&txns, true);
        assert_eq!(on.income, 2_000_000.0);
        assert_eq!(on.expenses, 1_280_000.0);
        assert_eq!(on.dominant_category.as_deref(), Some("Otros"));
    }

    #[test]
    fn test_interest_is_income() {
        let txns = vec![txn(date(1, 31), 1_234.0, Kind::Interest, "Ingreso", "ABONO INTERESES")];
        assert_eq!(compute_kpis(&txns, true).income, 1_234.0);
    }

    #[test]
    fn test_kpis_are_idempotent() {
        let txns = sample();
        assert_eq!(compute_kpis(&txns, false), compute_kpis(&txns, false));
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let txns = vec![
            txn(date(1, 5), 10.0, Kind::Purchase, "Salud", "A"),
            txn(date(1, 6), 10.0, Kind::Purchase, "Viajes", "B"),
        ];
        let totals = category_totals(&txns, false);
        assert_eq!(totals[0].category, "Salud");
        assert_eq!(compute_kpis(&txns, false).max_day.map(|d| d.date), Some(date(1, 5)));
    }

    #[test]
    fn test_member_totals_merge_legacy_names() {
        let members = vec![HouseholdMember::new("m1", "Sebastian")];
        let txns = vec![
            txn(date(1, 5), 10.0, Kind::Purchase, "Otros", "A").with_owner("m1"),
            txn(date(1, 6), 5.0, Kind::Purchase, "Otros", "B").with_owner("sebastian"),
            txn(date(1, 7), 20.0, Kind::Purchase, "Otros", "C").with_owner("Tía Rosa"),
        ];
        let totals = member_totals(&txns, &members, false);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].member.name, "Tía Rosa");
        assert!(!totals[0].member.known);
        assert_eq!(totals[1].member.id, "m1");
        assert_eq!(totals[1].amount, 15.0);
        assert_eq!(totals[1].count, 2);
    }

    #[test]
    fn test_member_totals_pick_first_spelling_every_time() {
        let txns = vec![
            txn(date(1, 5), 10.0, Kind::Purchase, "Otros", "A").with_owner("Tía Rosa"),
            txn(date(1, 6), 10.0, Kind::Purchase, "Otros", "B").with_owner("tia rosa"),
            txn(date(1, 7), 10.0, Kind::Purchase, "Otros", "C").with_owner("TIA ROSA"),
        ];
        for _ in 0..50 {
            let totals = member_totals(&txns, &[], false);
            assert_eq!(totals.len(), 1);
            assert_eq!(totals[0].member.name, "Tía Rosa");
            assert_eq!(totals[0].count, 3);
        }
    }

    #[test]
    fn test_monthly_series_is_chronological() {
        let txns = vec![
            txn(date(2, 1), 100.0, Kind::Purchase, "Otros", "A"),
            txn(date(1, 1), 300.0, Kind::Income, "Ingreso", "B"),
            txn(date(1, 9), 50.0, Kind::Purchase, "Otros", "C"),
        ];
        let series = monthly_series(&txns, false);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, YearMonth { year: 2026, month: 1 });
        assert_eq!(series[0].balance, 250.0);
        assert_eq!(series[1].expenses, 100.0);

        let months = month_totals(&txns, false);
        assert_eq!(months[0].month.to_string(), "2026-02");
    }

    #[test]
    fn test_merchant_and_ticket() {
        let txns = vec![
            txn(date(1, 1), 10.0, Kind::Purchase, "Otros", "CAFE"),
            txn(date(1, 2), 30.0, Kind::Purchase, "Otros", "TIENDA"),
            txn(date(1, 3), 20.0, Kind::Purchase, "Otros", "TIENDA"),
        ];
        let m = top_merchant(&txns, false).unwrap();
        assert_eq!(m.detail, "TIENDA");
        assert_eq!(m.visits, 2);
        assert_eq!(average_ticket(&txns, false), 20.0);
    }
}
