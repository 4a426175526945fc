//! Legacy JSON exports: an array of stored records (`fecha`, `tipo`, `valor`,
//! ...) as written by the old dashboard pipeline or dumped from the remote
//! table.

use anyhow::{Context, Result};
use cuentas_core::{CoreError, StoredRecord};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use crate::types::{ImportBatch, RejectReason, RejectedRow};

pub fn parse_json_str(text: &str) -> Result<ImportBatch> {
    let values: Vec<Value> = serde_json::from_str(text).context("parsing JSON export")?;
    let mut batch = ImportBatch::default();

    for (i, value) in values.into_iter().enumerate() {
        let row = i + 1;
        let outcome = StoredRecord::from_value(value).and_then(StoredRecord::into_raw).and_then(|raw| {
            if raw.amount == 0.0 {
                Err(CoreError::InvalidRecord("zero amount".to_string()))
            } else {
                Ok(raw)
            }
        });
        match outcome {
            Ok(raw) => batch.records.push(raw),
            Err(e) => {
                let reason = match e {
                    CoreError::InvalidDate(s) => RejectReason::InvalidDate(s),
                    CoreError::InvalidRecord(msg) if msg == "zero amount" => RejectReason::ZeroAmount,
                    CoreError::InvalidRecord(msg) if msg == "missing date" => RejectReason::MissingDate,
                    other => RejectReason::InvalidRecord(other.to_string()),
                };
                debug!(row, ?reason, "rejected JSON record");
                batch.rejected.push(RejectedRow { row, reason });
            }
        }
    }

    info!(
        accepted = batch.records.len(),
        rejected = batch.rejected.len(),
        "JSON export read"
    );
    Ok(batch)
}

pub fn parse_json_file(path: impl AsRef<Path>) -> Result<ImportBatch> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_json_str(&text).with_context(|| format!("parsing {}", path.display()))
}
