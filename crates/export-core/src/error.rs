//! Error types for export-core

use std::path::PathBuf;

/// Result type for export-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in export-core operations
///
/// Per-object and per-path failures (`InvalidInput`, `UnwritableSpec`,
/// `WriteFailed`, `DeleteFailed`) are recorded in the run report and never
/// abort a run. The remaining variants are configuration or ledger problems.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A decision function was given a value it cannot use
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A write spec that cannot be written (missing path, unknown format, escaping path)
    #[error("Unwritable spec: {reason}")]
    UnwritableSpec { reason: String },

    /// Creating a directory, serializing or writing a file failed
    #[error("Could not write {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    /// Removing a stale file failed
    #[error("Could not delete {path}: {reason}")]
    DeleteFailed { path: String, reason: String },

    /// Manifest file not found at expected path
    #[error("Manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// Manifest parsed but is not usable
    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    /// Error in ledger operations
    #[error("Ledger error: {message}")]
    LedgerError { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from export-fs
    #[error(transparent)]
    Fs(#[from] export_fs::Error),

    /// Codec error from export-codecs
    #[error(transparent)]
    Codec(#[from] export_codecs::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn unwritable(reason: impl Into<String>) -> Self {
        Self::UnwritableSpec {
            reason: reason.into(),
        }
    }
}
