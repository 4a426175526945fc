//! cuentas-ingest: import adapter mapping heterogeneous tabular sources
//! (bank CSV exports, workbooks, legacy JSON dumps) into raw records.

pub mod adapter;
pub mod columns;
pub mod parsers;
pub mod types;

pub use adapter::{ImportOptions, adapt_rows, adapt_sheet};
pub use columns::{ColumnMap, Field};
pub use types::{ImportBatch, RawCell, RejectReason, RejectedRow};

use anyhow::{Result, bail};
use std::path::Path;

/// Read any supported file, choosing the reader from its extension.
#[cfg_attr(not(feature = "xlsx"), allow(unused_variables))]
pub fn import_file(path: &Path, sheet: Option<&str>, opts: &ImportOptions) -> Result<ImportBatch> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "txt" => parsers::csv_sheet::parse_csv_file(path, opts),
        "json" => {
            let mut batch = parsers::json_export::parse_json_file(path)?;
            if let Some(owner) = &opts.default_owner {
                for r in batch.records.iter_mut().filter(|r| r.owner.is_empty()) {
                    r.owner = owner.clone();
                }
            }
            Ok(batch)
        }
        #[cfg(feature = "xlsx")]
        "xlsx" | "xls" | "xlsm" | "ods" => parsers::xlsx::parse_xlsx_file(path, sheet, opts),
        _ => bail!("unsupported import format: {}", path.display()),
    }
}
