//! Dashboard view model. `recompute` is a pure function of the application
//! state and a reference date; callers re-run it after every change.

use chrono::{Datelike, NaiveDate};
use cuentas_core::Transaction;
use serde::Serialize;

use crate::aggregation::{
    self, CategoryTotal, Kpis, Merchant, MemberTotal, MonthPoint,
};
use crate::category_rules::color_token;
use crate::period::filter_by_period;
use crate::state::AppState;

/// Categories shown in the ranking widget.
pub const TOP_CATEGORIES: usize = 5;

/// Savings rate above which a period counts as a good one.
const HEALTHY_SAVINGS_RATE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub amount: f64,
    pub count: usize,
    /// Share of total expenses
    pub percent: f64,
    pub color: &'static str,
}

/// One-line reading of the period's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SavingsSignal {
    Healthy,
    BelowTarget,
    Overspent,
    Flat,
}

impl SavingsSignal {
    pub fn of(kpis: &Kpis) -> Self {
        if kpis.savings_rate > HEALTHY_SAVINGS_RATE {
            SavingsSignal::Healthy
        } else if kpis.savings_rate > 0.0 {
            SavingsSignal::BelowTarget
        } else if kpis.balance < 0.0 {
            SavingsSignal::Overspent
        } else {
            SavingsSignal::Flat
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub period_label: String,
    pub kpis: Kpis,
    pub monthly: Vec<MonthPoint>,
    pub categories: Vec<CategorySlice>,
    pub top_categories: Vec<CategorySlice>,
    pub members: Vec<MemberTotal>,
    /// Expense rows, newest first
    pub expenses: Vec<Transaction>,
    /// Income rows, newest first
    pub income: Vec<Transaction>,
    /// Distinct expense categories, sorted, for the table filter
    pub table_categories: Vec<String>,
    pub top_merchant: Option<Merchant>,
    pub average_ticket: f64,
    pub signal: SavingsSignal,
    /// Latest date in the household's data, regardless of filters
    pub last_data_date: Option<NaiveDate>,
    /// Years present in the household's data, newest first
    pub available_years: Vec<i32>,
}

fn slices(totals: Vec<CategoryTotal>, expenses: f64) -> Vec<CategorySlice> {
    totals
        .into_iter()
        .map(|c| CategorySlice {
            percent: if expenses > 0.0 { c.amount * 100.0 / expenses } else { 0.0 },
            color: color_token(&c.category),
            category: c.category,
            amount: c.amount,
            count: c.count,
        })
        .collect()
}

fn newest_first(mut rows: Vec<Transaction>) -> Vec<Transaction> {
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

pub fn recompute(state: &AppState, reference: NaiveDate) -> DashboardView {
    let include = state.include_card_payments;
    let filtered = filter_by_period(
        &state.transactions,
        &state.household,
        &state.selection,
        reference,
        &state.members,
    );

    let kpis = aggregation::compute_kpis(&filtered, include);
    let categories = slices(aggregation::category_totals(&filtered, include), kpis.expenses);
    let top_categories = categories.iter().take(TOP_CATEGORIES).cloned().collect();

    let (income, expenses): (Vec<Transaction>, Vec<Transaction>) = filtered
        .iter()
        .filter(|t| t.counts_as_income() || t.counts_as_expense(include))
        .cloned()
        .partition(|t| t.counts_as_income());

    let mut table_categories: Vec<String> = expenses.iter().map(|t| t.category.clone()).collect();
    table_categories.sort();
    table_categories.dedup();

    let own = || state.transactions.iter().filter(|t| t.belongs_to(&state.household));
    let mut available_years: Vec<i32> = own().map(|t| t.date.year()).collect();
    available_years.sort_unstable_by(|a, b| b.cmp(a));
    available_years.dedup();

    DashboardView {
        period_label: state.selection.period.label(),
        monthly: aggregation::monthly_series(&filtered, include),
        members: aggregation::member_totals(&filtered, &state.members, include),
        top_merchant: aggregation::top_merchant(&filtered, include),
        average_ticket: aggregation::average_ticket(&filtered, include),
        signal: SavingsSignal::of(&kpis),
        kpis,
        categories,
        top_categories,
        expenses: newest_first(expenses),
        income: newest_first(income),
        table_categories,
        last_data_date: own().map(|t| t.date).max(),
        available_years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{Period, Selection};
    use cuentas_core::{HouseholdId, HouseholdMember, Kind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(d: NaiveDate, amount: f64, kind: Kind, category: &str) -> Transaction {
        Transaction::new(HouseholdId::new("fam-1"), d, amount, kind, category, "x")
            .unwrap()
            .with_owner("m1")
    }

    fn state() -> AppState {
        let mut s = AppState::new(HouseholdId::new("fam-1"))
            .with_members(vec![HouseholdMember::new("m1", "Sebastian")]);
        s.transactions = vec![
            txn(date(2026, 1, 2), 50_000.0, Kind::Purchase, "Alimentación"),
            txn(date(2026, 1, 3), 30_000.0, Kind::Purchase, "Suscripciones"),
            txn(date(2026, 1, 1), 2_000_000.0, Kind::Deposit, "Ingreso"),
            txn(date(2025, 12, 20), 99_000.0, Kind::Purchase, "Viajes"),
        ];
        s.selection = Selection::new(Period::Month);
        s
    }

    #[test]
    fn test_recompute_month() {
        let view = recompute(&state(), date(2026, 1, 15));
        assert_eq!(view.kpis.income, 2_000_000.0);
        assert_eq!(view.kpis.expenses, 80_000.0);
        assert_eq!(view.signal, SavingsSignal::Healthy);
        assert_eq!(view.categories[0].category, "Alimentación");
        assert_eq!(view.categories[0].percent, 62.5);
        assert_eq!(view.categories[0].color, "#22c55e");
        assert_eq!(view.expenses[0].date, date(2026, 1, 3));
        assert_eq!(view.income.len(), 1);
        assert_eq!(view.table_categories, vec!["Alimentación", "Suscripciones"]);
        assert_eq!(view.last_data_date, Some(date(2026, 1, 3)));
        assert_eq!(view.available_years, vec![2026, 2025]);
    }

    #[test]
    fn test_recompute_is_pure() {
        let s = state();
        let reference = date(2026, 1, 15);
        assert_eq!(recompute(&s, reference), recompute(&s, reference));
    }

    #[test]
    fn test_recompute_empty_state() {
        let view = recompute(&AppState::new(HouseholdId::new("fam-1")), date(2026, 1, 15));
        assert_eq!(view.kpis, Kpis::default());
        assert!(view.categories.is_empty());
        assert_eq!(view.signal, SavingsSignal::Flat);
        assert_eq!(view.last_data_date, None);
    }
}
