//! Error types for the translate crate.

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("ingest error: {0}")]
    Ingest(String),
}

/// Result type for translation operations.
pub type Result<T> = std::result::Result<T, TranslateError>;

// Convert TranslateError to the shared core error.
impl From<TranslateError> for seamark_core::Error {
    fn from(e: TranslateError) -> Self {
        match e {
            TranslateError::Config(s) => seamark_core::Error::Config(s),
            TranslateError::Serialization(s) => seamark_core::Error::Internal(s),
            TranslateError::Ingest(s) => seamark_core::Error::Ingest(s),
        }
    }
}
