//! Pull one chat's messages and attachments out of a rebuilt log.
//!
//! Every record of a [`ParsedLog`] holds a `result` list of updates. An
//! update belongs to a chat when `message.chat.title` equals the configured
//! title; updates without a message (edits, callbacks, member changes) are
//! ignored.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::BotlogError;
use crate::formatter;
use crate::media::{MEDIA_KINDS, MediaKind};
use crate::parser::{ParsedLog, RecordKey};

/// A downloadable attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub kind: MediaKind,
    pub file_id: String,
    pub file_unique_id: String,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

impl Document {
    /// Build from the JSON payload found under `kind`'s field.
    ///
    /// Lists (photo sizes) resolve to their last, largest entry. Payloads
    /// without both file identifiers yield `None`.
    pub fn from_value(kind: MediaKind, value: &Value) -> Option<Self> {
        let payload = match value {
            Value::Array(sizes) => sizes.last()?,
            other => other,
        };
        let text = |field: &str| payload.get(field).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            kind,
            file_id: text("file_id")?,
            file_unique_id: text("file_unique_id")?,
            mime_type: text("mime_type").or_else(|| kind.fallback_mime().map(str::to_string)),
            file_name: text("file_name"),
        })
    }
}

/// A chat message together with the key of the record it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub date: RecordKey,
    pub message: Value,
}

impl ChatMessage {
    /// Sender's first name, if the message has a sender.
    pub fn sender(&self) -> Option<&str> {
        self.message.get("from")?.get("first_name")?.as_str()
    }

    /// Message text; captions and media-only messages have none.
    pub fn text(&self) -> Option<&str> {
        self.message
            .get("text")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }
}

/// Title of the chat an update was posted in.
pub fn chat_title(update: &Value) -> Option<&str> {
    update.get("message")?.get("chat")?.get("title")?.as_str()
}

/// Messages of chat `title`, in record-key order then update order.
fn chat_messages<'a>(
    log: &'a ParsedLog,
    title: &'a str,
) -> impl Iterator<Item = (&'a RecordKey, &'a Value)> + 'a {
    log.iter().flat_map(move |(key, record)| {
        record
            .get("result")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(move |update| chat_title(update) == Some(title))
            .filter_map(|update| update.get("message"))
            .map(move |message| (key, message))
    })
}

/// Every attachment posted in chat `title`.
pub fn collect_documents(log: &ParsedLog, title: &str) -> Vec<Document> {
    let mut docs = Vec::new();
    for (key, message) in chat_messages(log, title) {
        for &kind in MEDIA_KINDS {
            let Some(value) = message.get(kind.field()) else {
                continue;
            };
            match Document::from_value(kind, value) {
                Some(doc) => docs.push(doc),
                None => debug!(key = %key, kind = kind.field(), "attachment without file id"),
            }
        }
    }
    docs
}

/// Every message posted in chat `title`.
pub fn collect_messages(log: &ParsedLog, title: &str) -> Vec<ChatMessage> {
    chat_messages(log, title)
        .filter(|(_, message)| crate::parser::is_truthy(message))
        .map(|(key, message)| ChatMessage {
            date: key.clone(),
            message: message.clone(),
        })
        .collect()
}

/// Output directory for chat `title`: lowercased, spaces replaced by `_`.
pub fn chat_dir(root: &Path, title: &str) -> PathBuf {
    let name = title
        .to_lowercase()
        .replace(' ', "_")
        .replace(['/', '\\'], "_");
    root.join(name)
}

/// Write the plain-text transcript of `messages` to `path`.
///
/// Returns the number of lines written.
pub fn dump_messages(
    messages: &[ChatMessage],
    path: &Path,
    timestamp_format: Option<&str>,
) -> Result<usize, BotlogError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let written = formatter::write_transcript(messages, &mut writer, timestamp_format, false)?;
    debug!(path = %path.display(), lines = written, "transcript written");
    Ok(written)
}
