//! Error types for Spendlog

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The expense file exists but a row cannot be read.
    /// `line` is 1-based and counts the header row.
    #[error("malformed expense file at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("malformed expense file: missing required column '{0}'")]
    MissingColumn(String),

    #[error("invalid expense index {index} (have {len} records)")]
    Index { index: usize, len: usize },

    #[error("{0}")]
    Validation(String),

    #[error("insufficient data: need at least {required} months (have {months})")]
    InsufficientData { months: usize, required: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// True for conditions the user should see as information, not as a failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
