use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("unknown transaction: {0}")]
    UnknownTransaction(String),

    #[error("record belongs to household {found}, expected {expected}")]
    ForeignHousehold { expected: String, found: String },

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
