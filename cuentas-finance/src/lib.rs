//! cuentas-finance: transaction classification, canonicalisation, period
//! filtering, aggregation and the dashboard view model

pub mod aggregation;
pub mod category_rules;
pub mod merchants;
pub mod period;
pub mod pipeline;
pub mod report;
pub mod state;

pub use aggregation::{Kpis, compute_kpis};
pub use category_rules::{CategoryRules, Classification, CustomRule, classify, color_token};
pub use period::{Period, Selection, TableFilter, filter_by_period};
pub use pipeline::{canonicalize, canonicalize_batch, canonicalize_stored, dedup, find_duplicates, new_manual};
pub use report::{DashboardView, recompute};
pub use state::{AppState, ChangeKind, ChangeNotice};
