//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// The Model2Vec loader reports through anyhow
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::Embedding(format!("{:#}", err))
    }
}
