//! Error types for the `botlog` application.
//!
//! Uses [`thiserror`] for ergonomic error derivation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in `botlog`.
///
/// Maps to exit codes: [`Config`](Self::Config) and [`Toml`](Self::Toml) → exit 1,
/// everything else → exit 2.
///
/// Per-record problems found while rebuilding a log never show up here; see
/// [`Rejection`](crate::parser::Rejection).
#[derive(Debug, Error)]
pub enum BotlogError {
    /// Configuration error (invalid flag combination, unreadable config file, missing token).
    #[error("configuration error: {0}")]
    Config(String),

    /// The log file handed to the parser could not be read.
    #[error("cannot read {}: {source}", path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A converted log or a JSON output could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A Bot API request failed.
    #[error("telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Fetching file contents from the Bot API file endpoint failed.
    #[error("download error: {0}")]
    Download(#[from] teloxide::DownloadError),
}

impl BotlogError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Toml(_) => 1,
            _ => 2,
        }
    }
}
