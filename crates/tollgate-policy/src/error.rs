use std::path::PathBuf;

/// Errors raised by the policy store.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Reading or writing the backing file failed.
    #[error("policy file {path}: {source}")]
    Io {
        /// The backing file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Entries could not be encoded.
    #[error("policy serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file exists but does not hold a valid policy map.
    #[error("corrupt policy file {path}: {reason}")]
    Corrupt {
        /// The backing file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
