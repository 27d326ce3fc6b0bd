//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for parity.
#[derive(Debug, thiserror::Error)]
pub enum ParityError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("data error for {ticker}: {reason}")]
    Data { ticker: String, reason: String },

    #[error("no data for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("insufficient data: have {rows} return rows, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("optimizer failed: {reason}")]
    Optimizer { reason: String },

    #[error("invalid weights for {strategy}: {reason}")]
    InvalidWeights { strategy: String, reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ParityError> for std::process::ExitCode {
    fn from(err: &ParityError) -> Self {
        let code: u8 = match err {
            ParityError::Io(_) => 1,
            ParityError::ConfigParse { .. }
            | ParityError::ConfigInvalid { .. }
            | ParityError::Universe(_) => 2,
            ParityError::Data { .. } | ParityError::NoData { .. } => 3,
            ParityError::Optimizer { .. } => 4,
            ParityError::InsufficientData { .. }
            | ParityError::InvalidWeights { .. }
            | ParityError::DimensionMismatch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
