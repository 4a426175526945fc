//! Import Adapter: resolve tabular rows into [`RawRecord`]s.
//!
//! Rows without a valid date or with a zero amount are rejected and reported;
//! the batch itself never aborts.

use cuentas_core::{CoreError, RawRecord, parse_date, parse_signed_amount};
use cuentas_core::text::is_blank;
use tracing::{debug, info};

use crate::columns::{ColumnMap, Field};
use crate::types::{ImportBatch, RawCell, RejectReason, RejectedRow};

/// Defaults applied to every row of one import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Owner used when the sheet has no owner column or the cell is empty
    pub default_owner: Option<String>,
    /// Bank used when the sheet has no bank column or the cell is empty
    pub default_bank: Option<String>,
}

/// Map a header row plus data rows into an [`ImportBatch`].
pub fn adapt_rows(header: &[RawCell], rows: &[Vec<RawCell>], opts: &ImportOptions) -> ImportBatch {
    let map = ColumnMap::from_header(header);
    let mut batch = ImportBatch::default();

    for (i, row) in rows.iter().enumerate() {
        let line = i + 1;
        if row.iter().all(|c| matches!(c, RawCell::Empty)) {
            continue;
        }
        match adapt_row(&map, row, opts) {
            Ok(record) => batch.records.push(record),
            Err(reason) => {
                debug!(row = line, ?reason, "rejected import row");
                batch.rejected.push(RejectedRow { row: line, reason });
            }
        }
    }

    info!(
        accepted = batch.records.len(),
        rejected = batch.rejected.len(),
        "import rows adapted"
    );
    batch
}

/// Split a sheet whose first row is the header.
pub fn adapt_sheet(sheet: &[Vec<RawCell>], opts: &ImportOptions) -> ImportBatch {
    match sheet.split_first() {
        Some((header, rows)) => adapt_rows(header, rows, opts),
        None => ImportBatch::default(),
    }
}

fn adapt_row(map: &ColumnMap, row: &[RawCell], opts: &ImportOptions) -> Result<RawRecord, RejectReason> {
    let date_cell = map.cell(row, Field::Date);
    let raw_date = date_cell.to_raw_date().ok_or(RejectReason::MissingDate)?;
    let date = parse_date(&raw_date).map_err(|e| match e {
        CoreError::InvalidDate(s) => RejectReason::InvalidDate(s),
        other => RejectReason::InvalidDate(other.to_string()),
    })?;

    let amount = parse_signed_amount(&map.cell(row, Field::Amount).to_raw_amount());
    if amount == 0.0 {
        return Err(RejectReason::ZeroAmount);
    }

    let text = |f: Field| {
        let s = map.cell(row, f).as_text();
        if is_blank(&s) { String::new() } else { s }
    };
    let or_default = |s: String, fallback: &Option<String>| {
        if s.is_empty() {
            fallback.clone().unwrap_or_default()
        } else {
            s
        }
    };

    let category = text(Field::Category);

    Ok(RawRecord {
        id: None,
        date: Some(date),
        amount,
        type_hint: text(Field::Type),
        kind: None,
        category_hint: (!category.is_empty()).then_some(category),
        detail: text(Field::Detail),
        bank: or_default(text(Field::Bank), &opts.default_bank),
        product: text(Field::Product),
        product_number: text(Field::ProductNumber),
        owner: or_default(text(Field::Owner), &opts.default_owner),
        household: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(s: &str) -> RawCell {
        RawCell::text(s)
    }

    fn header() -> Vec<RawCell> {
        vec![t("Fecha"), t("Tipo"), t("Valor"), t("Detalle"), t("Categoria"), t("Banco")]
    }

    #[test]
    fn test_adapts_valid_rows() {
        let rows = vec![
            vec![t("15/01/2026"), t("Compra"), t("-50.000"), t("EXITO WOW"), RawCell::Empty, t("Bancolombia")],
            vec![RawCell::Number(46037.0), t("Depósito"), RawCell::Number(2_000_000.0), t("NOMINA"), t("Sueldo"), RawCell::Empty],
        ];
        let opts = ImportOptions {
            default_owner: Some("m1".to_string()),
            default_bank: Some("Itaú".to_string()),
        };
        let batch = adapt_rows(&header(), &rows, &opts);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.rejected_count(), 0);

        let first = &batch.records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2026, 1, 15));
        assert_eq!(first.amount, -50000.0);
        assert_eq!(first.category_hint, None);
        assert_eq!(first.owner, "m1");

        let second = &batch.records[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2026, 1, 15));
        assert_eq!(second.category_hint.as_deref(), Some("Sueldo"));
        assert_eq!(second.bank, "Itaú");
    }

    #[test]
    fn test_rejects_bad_date_and_zero_amount() {
        let rows = vec![
            vec![t("no es fecha"), t("Compra"), t("10.000"), t("X")],
            vec![t("2026-01-02"), t("Compra"), t("abc"), t("Y")],
            vec![RawCell::Empty, t("Compra"), t("10.000"), t("Z")],
            vec![t("2026-01-02"), t("Compra"), t("10.000"), t("OK")],
            vec![RawCell::Empty, RawCell::Empty],
        ];
        let batch = adapt_rows(&header(), &rows, &ImportOptions::default());
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].detail, "OK");
        assert_eq!(batch.rejected_count(), 3);
        assert!(matches!(batch.rejected[0].reason, RejectReason::InvalidDate(_)));
        assert_eq!(batch.rejected[1].reason, RejectReason::ZeroAmount);
        assert_eq!(batch.rejected[2].reason, RejectReason::MissingDate);
    }

    #[test]
    fn test_empty_sheet() {
        assert!(adapt_sheet(&[], &ImportOptions::default()).records.is_empty());
    }
}
