//! Attachment kinds looked up in Telegram messages.
//!
//! Kinds are listed in lookup order. Each has the message field it lives
//! under and, for kinds whose payload carries no MIME type, the type
//! assumed when saving it.

/// A kind of downloadable message attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Document,
    Video,
    Voice,
    Photo,
}

/// All kinds, in lookup order.
pub const MEDIA_KINDS: &[MediaKind] = &[
    MediaKind::Document,
    MediaKind::Video,
    MediaKind::Voice,
    MediaKind::Photo,
];

impl MediaKind {
    /// Message field holding this attachment.
    pub fn field(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Video => "video",
            Self::Voice => "voice",
            Self::Photo => "photo",
        }
    }

    /// MIME type assumed when the attachment does not declare one.
    pub fn fallback_mime(self) -> Option<&'static str> {
        match self {
            Self::Document => None,
            Self::Video => Some("video/mp4"),
            Self::Voice => Some("audio/ogg"),
            Self::Photo => Some("image/jpg"),
        }
    }
}

/// Split a MIME type into `(type, subtype)`, dropping parameters and a `+suffix`.
///
/// `"image/svg+xml; charset=utf-8"` → `("image", "svg")`.
pub fn split_mime(mime: &str) -> Option<(&str, &str)> {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    let (top, sub) = essence.split_once('/')?;
    let sub = sub.split('+').next().unwrap_or_default();
    if top.is_empty() || sub.is_empty() {
        return None;
    }
    Some((top, sub))
}
