//! Transcript rendering for chat messages.
//!
//! One line per text message: `<date> / <sender>: <text>`, with line breaks
//! inside the message flattened to spaces. On a terminal the date is bold
//! and the sender colored.

use std::fmt::Write as _;
use std::io;

use owo_colors::OwoColorize;

use crate::extract::ChatMessage;
use crate::timestamp;

/// Shown when a message carries no sender.
const UNKNOWN_SENDER: &str = "unknown";

/// Format one message into `out`.
///
/// Returns `false`, leaving `out` empty, for messages without text.
pub fn format_message(
    message: &ChatMessage,
    timestamp_format: Option<&str>,
    use_color: bool,
    out: &mut String,
) -> bool {
    out.clear();
    let Some(text) = message.text() else {
        return false;
    };

    let date = timestamp::display_key(&message.date, timestamp_format);
    let sender = flatten(message.sender().unwrap_or(UNKNOWN_SENDER));
    let text = flatten(text);

    if use_color {
        let _ = write!(out, "{} / {}: {}", date.bold(), sender.cyan(), text);
    } else {
        let _ = write!(out, "{date} / {sender}: {text}");
    }
    true
}

/// Write the transcript of `messages`, sorted by record date.
///
/// The sort is stable: messages of one record keep their update order.
/// Returns the number of lines written.
pub fn write_transcript<W: io::Write>(
    messages: &[ChatMessage],
    writer: &mut W,
    timestamp_format: Option<&str>,
    use_color: bool,
) -> io::Result<usize> {
    let mut sorted: Vec<&ChatMessage> = messages.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut line = String::new();
    let mut written = 0;
    for message in sorted {
        if format_message(message, timestamp_format, use_color, &mut line) {
            writeln!(writer, "{line}")?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}

fn flatten(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
