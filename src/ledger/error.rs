use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("malformed ledger line: {line}")]
    MalformedEntry { line: String },
    #[error("invalid amount on write path: {amount}")]
    InvalidAmount { amount: crate::Kamas },
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),
}
