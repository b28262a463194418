//! Shared error vocabulary for the workspace.

/// Top-level error type crossing crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("bus error: {0}")]
    Bus(String),

    #[error("ingest error: {0}")]
    Ingest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
