//! Canonical transaction record

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::kind::Kind;

/// Fallback category for details no rule recognises.
pub const OTHER_CATEGORY: &str = "Otros";
/// Category given to income-like records that arrive without one.
pub const INCOME_CATEGORY: &str = "Ingreso";

/// Opaque partition key scoping every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseholdId(String);

impl HouseholdId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HouseholdId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A classified transaction in canonical form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Absent until the store assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub household: HouseholdId,
    /// Calendar day, serialized as YYYY-MM-DD
    pub date: NaiveDate,
    /// Magnitude; the direction lives in `kind`
    pub amount: f64,
    pub kind: Kind,
    pub category: String,
    pub detail: String,
    #[serde(default)]
    pub bank: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub product_number: String,
    /// Member id, or a display name for legacy records
    #[serde(default)]
    pub owner: String,
}

impl Transaction {
    /// Build a classified transaction. Fails on a negative or non-finite
    /// amount and on an empty category.
    pub fn new(
        household: HouseholdId,
        date: NaiveDate,
        amount: f64,
        kind: Kind,
        category: impl Into<String>,
        detail: impl Into<String>,
    ) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::InvalidRecord(format!(
                "amount must be a non-negative number, got {amount}"
            )));
        }
        let category = category.into();
        if category.trim().is_empty() {
            return Err(CoreError::InvalidRecord("empty category".to_string()));
        }
        Ok(Self {
            id: None,
            household,
            date,
            amount,
            kind,
            category: category.trim().to_string(),
            detail: detail.into().trim().to_string(),
            bank: String::new(),
            product: String::new(),
            product_number: String::new(),
            owner: String::new(),
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_bank(mut self, bank: impl Into<String>, product: impl Into<String>) -> Self {
        self.bank = bank.into();
        self.product = product.into();
        self
    }

    pub fn counts_as_income(&self) -> bool {
        self.kind.counts_as_income()
    }

    pub fn counts_as_expense(&self, include_card_payments: bool) -> bool {
        self.kind.counts_as_expense(include_card_payments)
    }

    pub fn belongs_to(&self, household: &HouseholdId) -> bool {
        &self.household == household
    }
}
