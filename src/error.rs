use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Insufficient data for {symbol}: have {have} candles, need {need}")]
    InsufficientData {
        symbol: String,
        have: usize,
        need: usize,
    },

    #[error("Market data fetch failed for {symbol}: {reason}")]
    ExternalFetch { symbol: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Build an `ExternalFetch` error from any displayable cause.
    pub fn fetch(symbol: &str, reason: impl std::fmt::Display) -> Self {
        AppError::ExternalFetch {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
