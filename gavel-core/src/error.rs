use thiserror::Error;

/// Custom error types for gavel
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media file error: {0}")]
    MediaFile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis error: {0}")]
    Analysis(String),
}

/// Result type for gavel operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
