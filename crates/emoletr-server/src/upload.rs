//! Temporary storage for uploaded documents.
//!
//! An upload lives on disk only while its text is extracted. [`TempUpload`]
//! owns the file and removes it when dropped, so every exit path of a
//! request cleans up after itself.

use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An uploaded file stored under the upload directory
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write `bytes` to `<dir>/<timestamp>_<sanitized original name>`
    pub async fn persist(dir: &Path, original_name: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let upload = Self::create(dir, original_name).await?;
        upload.fill(bytes).await?;
        debug!("Stored upload at {:?} ({} bytes)", upload.path, bytes.len());
        Ok(upload)
    }

    /// Create the empty file; from here on, dropping the guard removes it
    async fn create(dir: &Path, original_name: &str) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let upload = Self {
            path: dir.join(stored_filename(original_name)),
        };
        tokio::fs::File::create(&upload.path).await?;
        Ok(upload)
    }

    async fn fill(&self, bytes: &[u8]) -> std::io::Result<()> {
        tokio::fs::write(&self.path, bytes).await
    }

    /// Location of the stored file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            // Already gone
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {:?}: {}", self.path, e),
        }
    }
}

/// Timestamp-prefixed, sanitized name for a stored upload
pub fn stored_filename(original_name: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S_%6f");
    format!("{}_{}", timestamp, sanitize_filename(original_name))
}

/// Reduce a client-supplied file name to a safe, flat ASCII name
///
/// Directory components are flattened, anything outside `[A-Za-z0-9._-]` is
/// dropped (whitespace becomes `_`), and leading/trailing dots and
/// underscores are trimmed. An empty result becomes `upload`.
pub fn sanitize_filename(name: &str) -> String {
    let flattened: String = name
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => Some(c),
            '/' | '\\' => Some('_'),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let trimmed = flattened.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
