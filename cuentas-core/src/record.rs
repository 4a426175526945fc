//! Pre-classification records: the import adapter's output contract and the
//! loosely-typed JSON shape found in storage and legacy exports.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::amounts::{RawAmount, parse_signed_amount};
use crate::dates::{RawDate, parse_date};
use crate::error::{CoreError, Result};
use crate::kind::Kind;
use crate::text::is_blank;
use crate::transaction::HouseholdId;

/// A row resolved into canonical fields but not yet classified.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: Option<String>,
    pub date: Option<NaiveDate>,
    /// Amount with the sign the source wrote
    pub amount: f64,
    pub type_hint: String,
    /// Set when the source already fixed the kind (stored records)
    pub kind: Option<Kind>,
    pub category_hint: Option<String>,
    pub detail: String,
    pub bank: String,
    pub product: String,
    pub product_number: String,
    pub owner: String,
    pub household: Option<HouseholdId>,
}

impl RawRecord {
    /// Manual-entry record.
    pub fn manual(date: NaiveDate, amount: f64, type_hint: &str, detail: &str) -> Self {
        Self {
            date: Some(date),
            amount,
            type_hint: type_hint.to_string(),
            detail: detail.to_string(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category_hint = Some(category.to_string());
        self
    }

    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    /// Category hint only when it carries information.
    pub fn category_hint(&self) -> Option<&str> {
        self.category_hint
            .as_deref()
            .map(str::trim)
            .filter(|c| !is_blank(c))
    }
}

/// JSON record as read from storage. Accepts canonical English keys and the
/// legacy Spanish ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, alias = "fecha")]
    pub date: Option<Value>,
    #[serde(default, alias = "tipo", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, alias = "valor")]
    pub amount: Option<Value>,
    #[serde(default, alias = "categoria", deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, alias = "detalle", deserialize_with = "lenient_text")]
    pub detail: Option<String>,
    #[serde(default, alias = "banco", deserialize_with = "lenient_text")]
    pub bank: Option<String>,
    #[serde(default, alias = "producto", deserialize_with = "lenient_text")]
    pub product: Option<String>,
    #[serde(default, alias = "numero_producto", deserialize_with = "lenient_text")]
    pub product_number: Option<String>,
    #[serde(default, alias = "miembro", alias = "member_id", deserialize_with = "lenient_text")]
    pub owner: Option<String>,
    #[serde(default, alias = "family_id", deserialize_with = "lenient_text")]
    pub household: Option<String>,
}

/// Text columns accept any scalar; numbers and booleans are written out as
/// text and nested values are dropped.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

impl StoredRecord {
    /// Decode one element of a JSON array. A malformed element is an
    /// `InvalidRecord` for that element alone.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(CoreError::InvalidRecord("record is not an object".to_string()));
        }
        serde_json::from_value(value).map_err(|e| CoreError::InvalidRecord(e.to_string()))
    }

    /// Validate into a [`RawRecord`], failing fast on missing date or amount.
    ///
    /// The kind is fixed here: a stored amount has already lost its sign, so
    /// unrecognised type text defaults to expense instead of guessing from it.
    pub fn into_raw(self) -> Result<RawRecord> {
        let date = match self.date {
            Some(Value::String(s)) if !s.trim().is_empty() => parse_date(&RawDate::Text(s))?,
            Some(Value::Number(n)) => {
                parse_date(&RawDate::Serial(n.as_f64().unwrap_or(f64::NAN)))?
            }
            _ => return Err(CoreError::InvalidRecord("missing date".to_string())),
        };

        let amount = match self.amount {
            Some(Value::Number(n)) => parse_signed_amount(&RawAmount::Number(n.as_f64().unwrap_or(0.0))),
            Some(Value::String(s)) => parse_signed_amount(&RawAmount::Text(s)),
            _ => return Err(CoreError::InvalidRecord("missing amount".to_string())),
        };

        let id = match self.id {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let type_hint = self.kind.unwrap_or_default();
        let kind = Kind::from_hint(&type_hint, None);

        Ok(RawRecord {
            id,
            date: Some(date),
            amount,
            type_hint,
            kind: Some(kind),
            category_hint: self.category,
            detail: self.detail.unwrap_or_default(),
            bank: self.bank.unwrap_or_default(),
            product: self.product.unwrap_or_default(),
            product_number: self.product_number.unwrap_or_default(),
            owner: self.owner.unwrap_or_default(),
            household: self
                .household
                .filter(|h| !h.trim().is_empty())
                .map(HouseholdId::new),
        })
    }
}
