//! Fuzzy header mapping: which column holds which canonical field.

use cuentas_core::text::fold;
use tracing::warn;

use crate::types::RawCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Type,
    Amount,
    Category,
    Detail,
    ProductNumber,
    Product,
    Bank,
    Owner,
}

/// Checked in this order; the first field with a matching synonym claims the
/// column. Product number precedes product so "Número producto" lands there,
/// and the bare "movimiento" comes last so "Valor del movimiento" is an amount.
const SYNONYMS: &[(Field, &[&str])] = &[
    (Field::ProductNumber, &["numero", "number"]),
    (Field::Date, &["fecha", "date", "dia"]),
    (Field::Type, &["tipo", "type", "naturaleza"]),
    (Field::Amount, &["valor", "monto", "amount", "importe"]),
    (Field::Category, &["categoria", "category"]),
    (Field::Detail, &["detalle", "descripcion", "description", "concepto"]),
    (Field::Product, &["producto", "cuenta", "product"]),
    (Field::Bank, &["banco", "bank", "entidad"]),
    (Field::Owner, &["miembro", "owner", "titular"]),
    (Field::Type, &["movimiento"]),
];

/// Column index per canonical field; the first matching column wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    slots: Vec<(Field, usize)>,
}

impl ColumnMap {
    pub fn from_header(header: &[RawCell]) -> Self {
        let mut map = ColumnMap::default();
        for (idx, cell) in header.iter().enumerate() {
            let name = fold(&cell.as_text());
            if name.is_empty() {
                continue;
            }
            let field = SYNONYMS
                .iter()
                .find(|(_, words)| words.iter().any(|w| name.contains(w)))
                .map(|(f, _)| *f);
            match field {
                Some(f) if map.get(f).is_none() => map.slots.push((f, idx)),
                Some(_) => {}
                None => warn!(column = %name, "unmapped import column"),
            }
        }
        for required in [Field::Date, Field::Amount] {
            if map.get(required).is_none() {
                warn!(field = ?required, "import header has no column for field");
            }
        }
        map
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.slots.iter().find(|(f, _)| *f == field).map(|(_, i)| *i)
    }

    /// Cell for `field` in `row`, `Empty` when the column is missing.
    pub fn cell<'a>(&self, row: &'a [RawCell], field: Field) -> &'a RawCell {
        const EMPTY: &RawCell = &RawCell::Empty;
        self.get(field).and_then(|i| row.get(i)).unwrap_or(EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<RawCell> {
        names.iter().map(|n| RawCell::text(*n)).collect()
    }

    #[test]
    fn test_maps_spanish_export_headers() {
        let map = ColumnMap::from_header(&header(&[
            "Banco",
            "Tipo de transacción",
            "Valor",
            "Día de la transacción",
            "Producto",
            "Número producto",
            "Detalle",
            "Categoria ",
        ]));
        assert_eq!(map.get(Field::Bank), Some(0));
        assert_eq!(map.get(Field::Type), Some(1));
        assert_eq!(map.get(Field::Amount), Some(2));
        assert_eq!(map.get(Field::Date), Some(3));
        assert_eq!(map.get(Field::Product), Some(4));
        assert_eq!(map.get(Field::ProductNumber), Some(5));
        assert_eq!(map.get(Field::Detail), Some(6));
        assert_eq!(map.get(Field::Category), Some(7));
    }

    #[test]
    fn test_maps_english_headers_case_insensitive() {
        let map = ColumnMap::from_header(&header(&["DATE", "Description", "Amount", "Bank"]));
        assert_eq!(map.get(Field::Date), Some(0));
        assert_eq!(map.get(Field::Detail), Some(1));
        assert_eq!(map.get(Field::Amount), Some(2));
        assert_eq!(map.get(Field::Type), None);
    }

    #[test]
    fn test_movimiento_only_names_the_type_column_on_its_own() {
        let map = ColumnMap::from_header(&header(&[
            "Fecha",
            "Valor del movimiento",
            "Descripción del movimiento",
            "Movimiento",
        ]));
        assert_eq!(map.get(Field::Amount), Some(1));
        assert_eq!(map.get(Field::Detail), Some(2));
        assert_eq!(map.get(Field::Type), Some(3));

        let map = ColumnMap::from_header(&header(&["Tipo de movimiento", "Valor"]));
        assert_eq!(map.get(Field::Type), Some(0));
    }

    #[test]
    fn test_first_column_wins() {
        let map = ColumnMap::from_header(&header(&["Fecha", "Fecha valor", "Monto"]));
        assert_eq!(map.get(Field::Date), Some(0));
    }

    #[test]
    fn test_missing_column_reads_empty() {
        let map = ColumnMap::from_header(&header(&["Fecha"]));
        let row = vec![RawCell::text("2026-01-01")];
        assert_eq!(map.cell(&row, Field::Amount), &RawCell::Empty);
    }
}
