//! `botlog` — Rebuild Telegram bot update logs and extract chat media.
//!
//! The bot's client library dumps every `getUpdates` response into a plain
//! text log, one timestamped line per dump, the JSON sometimes spilling over
//! several lines. This crate turns such a log back into a JSON object keyed
//! by timestamp, then walks it to collect one chat's messages and
//! attachments, write a transcript, and download the files through the Bot
//! API.
//!
//! # Example
//!
//! ```
//! use botlog::LogRecordParser;
//!
//! let parser = LogRecordParser::new("getUpdates resp:").unwrap();
//! let log = parser.parse_str(
//!     "2020/10/05 21:13:08 getUpdates resp: {\"ok\":true,\"result\":[{\"update_id\":1}]}\n\
//!      2020/10/05 21:13:09 getUpdates resp: {\"ok\":true,\"result\":[]}\n",
//! );
//! assert_eq!(log.len(), 1);
//! assert!(log.get("2020/10/05 21:13:08").is_some());
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod formatter;
pub mod media;
pub mod parser;
pub mod telegram;
pub mod timestamp;

// Re-export primary API types for convenience.
pub use config::Config;
pub use download::{DownloadSummary, FileFetcher, download_documents};
pub use error::BotlogError;
pub use extract::{ChatMessage, Document, collect_documents, collect_messages};
pub use media::MediaKind;
pub use parser::{LineKind, LogRecordParser, ParsedLog, RecordKey, Rejection};
pub use timestamp::Timestamp;
