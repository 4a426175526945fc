//! Deterministic category rules: an ordered keyword table over the
//! transaction detail, first matching category wins.
//!
//! Table order is behaviour. "mercado pago" is a Compras keyword but
//! "mercado" already belongs to Alimentación, which is checked first.
//!
//! Automatic categorisation runs custom rules, then the merchant directory,
//! then the keyword table, then the fallback patterns.

use cuentas_core::text::{fold, is_blank};
use cuentas_core::{INCOME_CATEGORY, Kind, OTHER_CATEGORY};
use serde::{Deserialize, Serialize};

use crate::merchants::{merchant_category, pattern_category};

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Alimentación",
        &[
            "supermercado", "restaurante", "mercado", "exito", "ara", "jumbo", "carulla",
            "olimpica", "corral", "burger", "pizza", "sushi", "pollo", "cafe", "coffee",
            "panaderia", "fruver", "verduras", "carnes", "semolina", "domino", "archie",
            "wendys", "wendy", "subway", "mcdonalds", "kfc", "rappi", "uber eats", "ifood",
            "salchichas", "filandia", "pastelitos", "picara", "olivia", "voodoo", "mulera",
            "ko asian", "club house", "fort nassau", "roses cafe", "jv coffee", "harbourfront",
            "varietale", "amarti", "mis raices", "loma",
        ],
    ),
    (
        "Transporte",
        &[
            "uber", "didi", "gasolina", "terpel", "texaco", "esso", "mobil", "peaje",
            "estacion", "parqueadero", "parking", "eds", "combustible", "taxi", "cabify",
            "beat", "indriver", "sostenibles",
        ],
    ),
    (
        "Suscripciones",
        &[
            "spotify", "netflix", "disney", "hbo", "amazon prime", "prime video", "youtube",
            "apple music", "deezer", "google one", "icloud", "microsoft", "adobe", "canva",
            "dropbox", "notion", "slack", "zoom", "lifemiles", "suscripcion", "membership",
        ],
    ),
    (
        "Entretenimiento",
        &[
            "cine", "cinepolis", "cinecolombia", "teatro", "concierto", "evento", "steam",
            "playstation", "xbox", "nintendo", "gaming", "ticket colombia", "fteatrona",
        ],
    ),
    (
        "Viajes",
        &[
            "avianca", "latam", "wingo", "viva", "hotel", "marriott", "hilton", "airbnb",
            "booking", "expedia", "national car", "hertz", "avis", "aeropuerto", "airalo",
            "entrelazos", "courtyard", "curacao",
        ],
    ),
    (
        "Compras",
        &[
            "amazon", "mercado libre", "mercadolibre", "mercado pago", "falabella", "zara",
            "h&m", "adidas", "nike", "puma", "pandora", "bosi", "tennis", "gef", "cueros",
            "cuerosvel", "uniandinos", "tiendas punto",
        ],
    ),
    (
        "Servicios",
        &[
            "luz", "agua", "gas", "internet", "claro", "movistar", "tigo", "etb", "epm",
            "codensa", "vanti", "acueducto", "aseo", "administracion",
        ],
    ),
    (
        "Vivienda",
        &["alquiler", "renta", "arriendo", "hipoteca", "credito vivienda", "inmobiliaria"],
    ),
    (
        "Salud",
        &[
            "farmacia", "drogueria", "cruz verde", "farmatodo", "locatel", "medico",
            "hospital", "clinica", "seguro medico", "eps", "medicina prepagada", "consultorio",
            "consultori", "odontolog", "dentista",
        ],
    ),
    (
        "Transferencias",
        &["transferencia", "portal internet", "bre-b", "pse", "daviplata", "nequi"],
    ),
];

/// Display colour per category; unknown categories use the "Otros" colour.
const COLORS: &[(&str, &str)] = &[
    ("Alimentación", "#22c55e"),
    ("Transporte", "#f59e0b"),
    ("Suscripciones", "#8b5cf6"),
    ("Entretenimiento", "#ec4899"),
    ("Viajes", "#14b8a6"),
    ("Compras", "#f97316"),
    ("Servicios", "#06b6d4"),
    ("Vivienda", "#6366f1"),
    ("Salud", "#ef4444"),
    ("Transferencias", "#3b82f6"),
    ("Finanzas", "#0ea5e9"),
    ("Educación", "#a855f7"),
    ("Belleza", "#f472b6"),
    ("Mascotas", "#a16207"),
    ("Oficina", "#78716c"),
    ("Deportes", "#84cc16"),
    ("Otros", "#64748b"),
    ("Ingreso", "#10b981"),
];

pub fn color_token(category: &str) -> &'static str {
    COLORS
        .iter()
        .find(|(c, _)| *c == category)
        .or_else(|| COLORS.iter().find(|(c, _)| *c == OTHER_CATEGORY))
        .map(|(_, color)| *color)
        .unwrap_or("#64748b")
}

/// One user-defined rule, evaluated before the built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRule {
    pub category: String,
    pub keywords: Vec<String>,
}

/// Result of classifying a record
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: Kind,
    pub category: String,
}

/// Ordered (category, keywords) table; custom rules come first.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    table: Vec<(String, Vec<String>)>,
    custom: usize,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryRules {
    pub fn builtin() -> Self {
        Self {
            table: BUILTIN
                .iter()
                .map(|(cat, kws)| (cat.to_string(), kws.iter().map(|k| k.to_lowercase()).collect()))
                .collect(),
            custom: 0,
        }
    }

    /// Built-in table with `custom` rules checked first, in the given order.
    pub fn with_custom(custom: &[CustomRule]) -> Self {
        let mut table: Vec<(String, Vec<String>)> = custom
            .iter()
            .filter(|r| !r.category.trim().is_empty())
            .map(|r| {
                let kws = r
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (r.category.trim().to_string(), kws)
            })
            .collect();
        let custom = table.len();
        table.extend(Self::builtin().table);
        Self { table, custom }
    }

    /// Category names in table order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.table.iter().map(|(c, _)| c.as_str())
    }

    /// First category with a keyword contained in the detail, else "Otros".
    pub fn category_for(&self, detail: &str) -> &str {
        let detail = detail.trim().to_lowercase();
        if detail.is_empty() || detail == "n/a" {
            return OTHER_CATEGORY;
        }
        keyword_match(&self.table, &detail).unwrap_or(OTHER_CATEGORY)
    }

    /// Category for a detail with no usable hint.
    pub fn auto_category(&self, detail: &str) -> &str {
        let lower = detail.trim().to_lowercase();
        if lower.is_empty() || lower == "n/a" {
            return OTHER_CATEGORY;
        }
        let (custom, builtin) = self.table.split_at(self.custom);
        keyword_match(custom, &lower)
            .or_else(|| merchant_category(detail))
            .or_else(|| keyword_match(builtin, &lower))
            .or_else(|| pattern_category(detail))
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Kind from the type text, category from the hint or the detail.
    pub fn classify(
        &self,
        detail: &str,
        type_hint: &str,
        category_hint: Option<&str>,
        signed_amount: Option<f64>,
    ) -> Classification {
        let kind = Kind::from_hint(type_hint, signed_amount);
        let category = self.categorize(detail, kind, category_hint);
        Classification { kind, category }
    }

    /// Category for an already-kinded record. An "Otros" hint carries no
    /// information and is recategorised like a missing one.
    pub fn categorize(&self, detail: &str, kind: Kind, category_hint: Option<&str>) -> String {
        match category_hint
            .map(str::trim)
            .filter(|c| !is_blank(c) && fold(c) != fold(OTHER_CATEGORY))
        {
            Some(hint) => hint.to_string(),
            None if kind.counts_as_income() => INCOME_CATEGORY.to_string(),
            None => self.auto_category(detail).to_string(),
        }
    }
}

fn keyword_match<'a>(table: &'a [(String, Vec<String>)], lower: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(_, kws)| kws.iter().any(|k| lower.contains(k.as_str())))
        .map(|(c, _)| c.as_str())
}

/// Classify with the built-in table.
pub fn classify(detail: &str, type_hint: &str, category_hint: Option<&str>) -> Classification {
    CategoryRules::builtin().classify(detail, type_hint, category_hint, None)
}
