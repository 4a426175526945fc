pub mod csv_sheet;
pub mod json_export;
#[cfg(feature = "xlsx")]
pub mod xlsx;
