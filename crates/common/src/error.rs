//! Error types for the SearchML common crate.

/// Result type for common-crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the serialization core and its utilities.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value failed construction-time validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A binary stream or document could not be decoded.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An index mapping is missing expected structural keys.
    #[error("schema error: {0}")]
    Schema(String),

    /// Filesystem error while loading a mapping.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}
