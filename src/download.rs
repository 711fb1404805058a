//! Sequential download of collected attachments.
//!
//! Files land in `<dir>/<top-level MIME type>/<file_unique_id><ext>`.
//! A file already on disk is never fetched again, so an interrupted run can
//! simply be restarted.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::BotlogError;
use crate::extract::Document;
use crate::media::split_mime;

/// Folder for attachments whose MIME type is unknown.
const OTHER_FOLDER: &str = "other";

/// Fetches the binary content behind a Telegram file identifier.
#[allow(async_fn_in_trait)]
pub trait FileFetcher {
    /// Write the content of `file_id` to `dest`, creating or truncating it.
    async fn fetch(&self, file_id: &str, dest: &Path) -> Result<(), BotlogError>;
}

/// Outcome counts of [`download_documents`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Target path of `doc` below `dir`.
///
/// The extension comes from the MIME subtype, else the original file name
/// is appended, else `.raw`.
pub fn document_path(dir: &Path, doc: &Document) -> PathBuf {
    let mime = doc.mime_type.as_deref().and_then(split_mime);
    let folder = mime.map_or(OTHER_FOLDER, |(top, _)| top);

    let name = match (mime, doc.file_name.as_deref()) {
        (Some((_, sub)), _) => format!("{}.{sub}", doc.file_unique_id),
        (None, Some(file_name)) if !file_name.is_empty() => {
            format!("{}_{}", doc.file_unique_id, file_name.replace(['/', '\\'], "_"))
        }
        _ => format!("{}.raw", doc.file_unique_id),
    };

    dir.join(folder).join(name)
}

/// Download every document into `dir`, one at a time.
///
/// Failures are logged and counted; they never stop the loop.
pub async fn download_documents<F: FileFetcher>(
    fetcher: &F,
    docs: &[Document],
    dir: &Path,
) -> DownloadSummary {
    let mut summary = DownloadSummary::default();
    let total = docs.len();

    for (i, doc) in docs.iter().enumerate() {
        let dest = document_path(dir, doc);
        if dest.exists() {
            debug!(path = %dest.display(), "already downloaded");
            summary.skipped += 1;
            continue;
        }

        info!("[{}/{total}] {}", i + 1, dest.display());
        match download_one(fetcher, doc, &dest).await {
            Ok(()) => summary.downloaded += 1,
            Err(e) => {
                warn!(file_id = %doc.file_id, path = %dest.display(), error = %e, "download failed");
                // Never leave a partial file behind: it would be skipped next run.
                let _ = tokio::fs::remove_file(&dest).await;
                summary.failed += 1;
            }
        }
    }

    summary
}

async fn download_one<F: FileFetcher>(
    fetcher: &F,
    doc: &Document,
    dest: &Path,
) -> Result<(), BotlogError> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    fetcher.fetch(&doc.file_id, dest).await
}
