//! Record reconstruction for Telegram bot update logs.
//!
//! The bot client dumps every `getUpdates` response into a plain text log,
//! prefixed by the standard `YYYY/MM/DD HH:MM:SS` timestamp. A dump may span
//! several physical lines, and nothing but the next timestamped line marks
//! where it ends. [`LogRecordParser`] walks the log once, classifying each
//! line as a [`LineKind`], accumulates the text of every record, then parses
//! each accumulated buffer as JSON and keeps only the records that carry a
//! non-empty `result` list.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::BotlogError;

/// Marker written by the Go Telegram client in front of a response dump.
pub const DEFAULT_MARKER: &str = "getUpdates resp:";

/// Generic timestamp prefix: any line opening with a `YYYY/MM/DD` date.
const TIMESTAMP_PREFIX: &str = r"^\d{4}/\d{2}/\d{2}";

/// Timestamp captured at the start of a record.
pub type RecordKey = String;

/// The classification of a single log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Timestamp, marker and an opening brace: a new record begins.
    RecordStart {
        /// Timestamp prefix, used as the record key.
        key: &'a str,
        /// Text from the opening brace to the end of the line, terminator included.
        fragment: &'a str,
    },
    /// Any other timestamped line; closes the open record.
    RecordBoundary,
    /// A line without a timestamp prefix.
    Continuation,
}

/// Accumulation state: at most one record is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State<'a> {
    Stop,
    Start(&'a str),
}

/// Why an accumulated record was left out of the [`ParsedLog`].
#[derive(Debug)]
pub enum Rejection {
    /// The buffer is not valid JSON.
    Malformed(serde_json::Error),
    /// The JSON value is falsy, or its `result` field is missing or falsy.
    EmptyResult,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed JSON: {e}"),
            Self::EmptyResult => f.write_str("no result payload"),
        }
    }
}

/// Rebuilt log: record key → parsed `getUpdates` response.
///
/// Serializes as one JSON object, keys in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedLog {
    records: BTreeMap<RecordKey, Value>,
}

impl ParsedLog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.records.get(key)
    }

    /// Records in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &Value)> {
        self.records.iter()
    }

    /// Load a log previously written by [`ParsedLog::to_json`].
    pub fn load(path: &Path) -> Result<Self, BotlogError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            BotlogError::UnreadableInput {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Serialize as a JSON object, compact unless `pretty` is set.
    pub fn to_json(&self, pretty: bool) -> Result<String, BotlogError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

impl FromIterator<(RecordKey, Value)> for ParsedLog {
    fn from_iter<I: IntoIterator<Item = (RecordKey, Value)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Line classifier and record accumulator for one marker.
#[derive(Debug, Clone)]
pub struct LogRecordParser {
    start: Regex,
    boundary: Regex,
}

impl LogRecordParser {
    /// Build a parser recognising record starts introduced by `marker`.
    ///
    /// The marker is matched literally, surrounding whitespace ignored.
    pub fn new(marker: &str) -> Result<Self, BotlogError> {
        let marker = marker.trim();
        if marker.is_empty() {
            return Err(BotlogError::Config("record marker cannot be empty".into()));
        }
        // Greedy key: the last marker occurrence on the line wins.
        let start = Regex::new(&format!(
            r"^(\d{{4}}/\d{{2}}/\d{{2}}.*)\s+{}\s*(\{{.*)",
            regex::escape(marker)
        ))
        .map_err(|e| BotlogError::Config(format!("invalid record marker {marker:?}: {e}")))?;
        let boundary = Regex::new(TIMESTAMP_PREFIX)
            .map_err(|e| BotlogError::Config(format!("invalid timestamp pattern: {e}")))?;
        Ok(Self { start, boundary })
    }

    /// Classify one line. Record starts take priority over boundaries.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(caps) = self.start.captures(line) {
            let key = caps.get(1).map_or("", |m| m.as_str()).trim_end();
            // `.` stops at `\n`, so take the raw tail to keep the terminator.
            let fragment = caps.get(2).map_or("", |m| &line[m.start()..]);
            return LineKind::RecordStart { key, fragment };
        }
        if self.boundary.is_match(line) {
            LineKind::RecordBoundary
        } else {
            LineKind::Continuation
        }
    }

    /// Single pass over `text`, returning the raw buffer of every record.
    ///
    /// Every line, the start fragment included, keeps its terminator. A
    /// repeated key replaces the earlier buffer.
    pub fn accumulate(&self, text: &str) -> BTreeMap<RecordKey, String> {
        let mut buffers: BTreeMap<RecordKey, String> = BTreeMap::new();
        let mut state = State::Stop;

        for line in text.split_inclusive('\n') {
            match self.classify(line) {
                LineKind::RecordStart { key, fragment } => {
                    if buffers.insert(key.to_owned(), fragment.to_owned()).is_some() {
                        debug!(key, "record key seen again, replacing earlier buffer");
                    }
                    state = State::Start(key);
                }
                LineKind::RecordBoundary => state = State::Stop,
                LineKind::Continuation => {
                    if let State::Start(key) = state
                        && let Some(buffer) = buffers.get_mut(key)
                    {
                        buffer.push_str(line);
                    }
                }
            }
        }

        buffers
    }

    /// Rebuild every record of `text`, dropping the ones that do not validate.
    pub fn parse_str(&self, text: &str) -> ParsedLog {
        let buffers = self.accumulate(text);
        let total = buffers.len();

        let log: ParsedLog = buffers
            .into_iter()
            .filter_map(|(key, buffer)| match validate_record(&buffer) {
                Ok(value) => Some((key, value)),
                Err(reason) => {
                    debug!(key = %key, %reason, "dropping record");
                    None
                }
            })
            .collect();

        debug!(records = total, kept = log.len(), "log rebuilt");
        log
    }

    /// Read `path` and rebuild its records.
    ///
    /// Only a failure to read the file is an error. Invalid bytes are
    /// replaced rather than rejected.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedLog, BotlogError> {
        let bytes = std::fs::read(path).map_err(|source| BotlogError::UnreadableInput {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.parse_str(&text))
    }
}

/// Parse one accumulated buffer and check that it carries a result payload.
pub fn validate_record(buffer: &str) -> Result<Value, Rejection> {
    let json = sanitize_json_newlines(buffer);
    let value: Value = serde_json::from_str(&json).map_err(Rejection::Malformed)?;
    if !is_truthy(&value) || !value.get("result").is_some_and(is_truthy) {
        return Err(Rejection::EmptyResult);
    }
    Ok(value)
}

/// Escape raw line breaks and tabs that sit inside JSON string literals.
///
/// A string value broken over several log lines carries bare control
/// characters once the lines are glued back together. A `\r\n` pair becomes
/// a single `\n`. Text outside string literals is left untouched.
pub fn sanitize_json_newlines(s: &str) -> Cow<'_, str> {
    if !s.contains(['\n', '\r', '\t']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("\\n");
            }
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// Falsy values: `null`, `false`, zero, and empty strings, arrays or objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
