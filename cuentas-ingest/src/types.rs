use chrono::NaiveDate;
use cuentas_core::{RawAmount, RawDate, RawRecord};
use serde::{Deserialize, Serialize};

/// One spreadsheet / CSV cell before interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl RawCell {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(s)
        }
    }

    /// Cell rendered as trimmed text ("" for empty).
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            RawCell::Number(n) => n.to_string(),
            RawCell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn to_raw_date(&self) -> Option<RawDate> {
        match self {
            RawCell::Empty => None,
            RawCell::Text(s) => Some(RawDate::Text(s.clone())),
            RawCell::Number(n) => Some(RawDate::Serial(*n)),
            RawCell::Date(d) => Some(RawDate::Date(*d)),
        }
    }

    pub fn to_raw_amount(&self) -> RawAmount {
        match self {
            RawCell::Number(n) => RawAmount::Number(*n),
            other => RawAmount::Text(other.as_text()),
        }
    }
}

/// Why a row did not make it into the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RejectReason {
    InvalidDate(String),
    MissingDate,
    ZeroAmount,
    InvalidRecord(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub reason: RejectReason,
}

/// Output of one import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportBatch {
    pub records: Vec<RawRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportBatch {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn extend(&mut self, other: ImportBatch) {
        self.records.extend(other.records);
        self.rejected.extend(other.rejected);
    }
}
