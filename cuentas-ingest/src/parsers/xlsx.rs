//! Workbook import (.xlsx / .xls / .ods) via calamine.

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader};
use std::path::Path;

use crate::adapter::{ImportOptions, adapt_sheet};
use crate::types::{ImportBatch, RawCell};

/// Sheet name used by the consolidated bank workbook.
pub const DEFAULT_SHEET: &str = "Consolidado";

fn to_cell(data: &Data) -> RawCell {
    match data {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::text(b.to_string()),
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        _ => RawCell::Empty,
    }
}

/// Read one sheet into raw cell rows. `sheet = None` picks "Consolidado" when
/// present, otherwise the first sheet.
pub fn read_xlsx_rows(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Vec<Vec<RawCell>>> {
    let path = path.as_ref();
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| anyhow!("failed to open workbook {}: {e}", path.display()))?;

    let names = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(s) => s.to_string(),
        None => names
            .iter()
            .find(|n| n.as_str() == DEFAULT_SHEET)
            .or_else(|| names.first())
            .cloned()
            .context("workbook has no sheets")?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| anyhow!("reading sheet {name}: {e}"))?;

    Ok(range.rows().map(|row| row.iter().map(to_cell).collect()).collect())
}

pub fn parse_xlsx_file(path: impl AsRef<Path>, sheet: Option<&str>, opts: &ImportOptions) -> Result<ImportBatch> {
    let rows = read_xlsx_rows(path, sheet)?;
    Ok(adapt_sheet(&rows, opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversion() {
        assert_eq!(to_cell(&Data::Empty), RawCell::Empty);
        assert_eq!(to_cell(&Data::Int(46037)), RawCell::Number(46037.0));
        assert_eq!(to_cell(&Data::String("  ".to_string())), RawCell::Empty);
        assert_eq!(to_cell(&Data::String("Compra".to_string())), RawCell::Text("Compra".to_string()));
    }

    #[test]
    fn test_missing_workbook_is_error() {
        assert!(read_xlsx_rows("/nonexistent/movimientos.xlsx", None).is_err());
    }
}
