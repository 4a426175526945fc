//! Delimited-text exports (bank CSV downloads, sheets saved as CSV).
//!
//! Spanish-locale exports often use `;` because `,` is the decimal separator;
//! the delimiter is picked from the header line.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::adapter::{ImportOptions, adapt_sheet};
use crate::types::{ImportBatch, RawCell};

fn detect_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let semis = first.matches(';').count();
    let commas = first.matches(',').count();
    if semis > commas { b';' } else { b',' }
}

/// Read delimited text into raw cell rows (header included).
pub fn read_csv_rows(text: &str) -> Result<Vec<Vec<RawCell>>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(detect_delimiter(text))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("reading CSV record")?;
        rows.push(record.iter().map(RawCell::text).collect());
    }
    Ok(rows)
}

pub fn parse_csv_str(text: &str, opts: &ImportOptions) -> Result<ImportBatch> {
    Ok(adapt_sheet(&read_csv_rows(text)?, opts))
}

pub fn parse_csv_file(path: impl AsRef<Path>, opts: &ImportOptions) -> Result<ImportBatch> {
    let path = path.as_ref();
    let mut buf = Vec::new();
    std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .read_to_end(&mut buf)
        .with_context(|| format!("reading {}", path.display()))?;
    let text = String::from_utf8_lossy(&buf);
    parse_csv_str(&text, opts).with_context(|| format!("parsing {}", path.display()))
}
