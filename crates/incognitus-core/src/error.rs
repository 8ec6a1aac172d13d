use thiserror::Error;

use crate::lang::Lang;

/// Top-level error type for the Incognitus client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx reply from the backend. Displays as the server's `detail`
    /// message, or the per-call default when the body carried none.
    #[error("{message}")]
    Fetch { status: u16, message: String },

    /// Non-2xx reply while loading a translation table.
    #[error("failed to load translations for {lang}: HTTP {status}")]
    TranslationFetch { lang: Lang, status: u16 },

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Preference storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } | Self::TranslationFetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}
