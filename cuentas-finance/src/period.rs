//! Period and member filtering of a household's transactions.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use cuentas_core::text::fold;
use cuentas_core::{CoreError, HouseholdId, HouseholdMember, Transaction};
use serde::{Deserialize, Serialize};

/// Reporting window, always relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    Month,
    ThreeMonths,
    #[default]
    SixMonths,
    /// Calendar year; `None` means the reference date's year
    Year(Option<i32>),
    All,
}

impl Period {
    /// Inclusive `(start, end)` bounds, `None` when unbounded.
    pub fn window(&self, reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let month_start = |back: u32| {
            reference
                .with_day(1)
                .and_then(|d| d.checked_sub_months(Months::new(back)))
                .unwrap_or(reference)
        };
        match self {
            Period::Month => Some((month_start(0), reference)),
            Period::ThreeMonths => Some((month_start(2), reference)),
            Period::SixMonths => Some((month_start(5), reference)),
            Period::Year(year) => {
                let y = year.unwrap_or(reference.year());
                let start = NaiveDate::from_ymd_opt(y, 1, 1)?;
                let end = NaiveDate::from_ymd_opt(y, 12, 31)?;
                Some((start, end))
            }
            Period::All => None,
        }
    }

    pub fn contains(&self, date: NaiveDate, reference: NaiveDate) -> bool {
        match self.window(reference) {
            Some((start, end)) => date >= start && date <= end,
            None => true,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Period::Month => "Este mes".to_string(),
            Period::ThreeMonths => "Últimos 3 meses".to_string(),
            Period::SixMonths => "Últimos 6 meses".to_string(),
            Period::Year(Some(y)) => format!("Año {y}"),
            Period::Year(None) => "Este año".to_string(),
            Period::All => "Todo".to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month => f.write_str("month"),
            Period::ThreeMonths => f.write_str("3months"),
            Period::SixMonths => f.write_str("6months"),
            Period::Year(None) => f.write_str("year"),
            Period::Year(Some(y)) => write!(f, "{y}"),
            Period::All => f.write_str("all"),
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    /// Accepts `month`, `3months`, `6months`, `year`, `all` or a 4-digit year.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(Period::Month),
            "3months" => Ok(Period::ThreeMonths),
            "6months" => Ok(Period::SixMonths),
            "year" => Ok(Period::Year(None)),
            "all" => Ok(Period::All),
            other if other.len() == 4 && other.chars().all(|c| c.is_ascii_digit()) => other
                .parse()
                .map(|y| Period::Year(Some(y)))
                .map_err(|_| CoreError::InvalidRecord(format!("unknown period: {s}"))),
            _ => Err(CoreError::InvalidRecord(format!("unknown period: {s}"))),
        }
    }
}

/// What the user is currently looking at.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub period: Period,
    /// Selected member ids; empty means everyone
    #[serde(default)]
    pub members: Vec<String>,
}

impl Selection {
    pub fn new(period: Period) -> Self {
        Self { period, members: Vec::new() }
    }

    pub fn with_members<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Owner passes when it is a selected id, or (legacy records) the display
    /// name of a selected member.
    pub fn includes_owner(&self, owner: &str, members: &[HouseholdMember]) -> bool {
        if self.members.is_empty() {
            return true;
        }
        let owner = owner.trim();
        let folded = fold(owner);
        self.members.iter().any(|id| {
            let by_id = owner == id;
            let by_name = members
                .iter()
                .find(|m| &m.id == id)
                .is_some_and(|m| !folded.is_empty() && fold(&m.name) == folded);
            by_id || by_name
        })
    }
}

/// Transactions of `household` inside the selected period and members.
pub fn filter_by_period(
    txns: &[Transaction],
    household: &HouseholdId,
    selection: &Selection,
    reference: NaiveDate,
    members: &[HouseholdMember],
) -> Vec<Transaction> {
    let window = selection.period.window(reference);
    txns.iter()
        .filter(|t| t.belongs_to(household))
        .filter(|t| match window {
            Some((start, end)) => t.date >= start && t.date <= end,
            None => true,
        })
        .filter(|t| selection.includes_owner(&t.owner, members))
        .cloned()
        .collect()
}

/// Secondary filter for the transaction tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFilter {
    pub category: Option<String>,
    pub search: String,
}

impl TableFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(cat) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if txn.category != cat {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&txn.detail, &txn.category, &txn.bank, &txn.product]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, txns: &'a [Transaction]) -> Vec<&'a Transaction> {
        txns.iter().filter(|t| self.matches(t)).collect()
    }
}
