//! Error types for export-codecs

use crate::format::Format;

/// Result type for export-codecs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serializing a payload
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown format tag: {0}")]
    UnknownFormat(String),

    #[error("No codec registered for {0}")]
    NotRegistered(Format),

    #[error("Invalid {format} content: {message}")]
    InvalidContent { format: Format, message: String },

    #[error("Failed to serialize {format} content: {message}")]
    Serialize { format: Format, message: String },
}

impl Error {
    pub fn invalid(format: Format, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            format,
            message: message.into(),
        }
    }

    pub fn serialize(format: Format, message: impl ToString) -> Self {
        Self::Serialize {
            format,
            message: message.to_string(),
        }
    }
}
