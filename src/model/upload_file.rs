//! In-memory scan blob handed from the uploader to the orchestrator.

use std::path::Path;
use std::sync::Arc;

use crate::constants::ACCEPTED_EXTENSIONS;
use crate::error::UploadError;

/// A single file selected by the user, read fully into memory.
///
/// Bytes are shared so the blob can be handed to an upload thread without
/// copying it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent in the multipart part
    pub name: String,
    /// Raw file contents
    pub bytes: Arc<[u8]>,
}

impl UploadFile {
    /// Create a blob from a name and raw bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk. The file name becomes the blob name.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::debug!("Read {:?} ({} bytes)", path, bytes.len());
        Ok(Self::new(name, bytes))
    }

    /// Size of the blob in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob is empty. Empty files are still uploaded.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Check a file name against the picker's extension filter (case-insensitive).
///
/// This is a hint for the user only; the service decides what it accepts.
pub fn has_accepted_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
