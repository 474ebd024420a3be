use std::path::{Path, PathBuf};

use nanoid::nanoid;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Result, TextLensError};

/// The shared upload directory both services mount. File names double as
/// cross-service asset references, so writes are namespaced per request
/// and reads refuse anything that would escape the root.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an upload under a unique sanitized name derived from the
    /// claimed filename. The file is fully written, synced, and closed
    /// before this returns, so the name can safely cross a process
    /// boundary afterwards.
    pub async fn store_upload(&self, claimed_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let sanitized = sanitize_filename(claimed_name);
        if sanitized.is_empty() {
            return Err(TextLensError::InvalidRequest(
                "Filename has no usable characters".to_string(),
            ));
        }

        let unique = format!("{}_{}", nanoid!(10), sanitized);
        let path = self.root.join(&unique);

        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        debug!(file = %path.display(), size = bytes.len(), "stored upload");
        Ok(path)
    }

    /// Resolve a cross-service file reference to a path under the root.
    /// The reference must be a bare file name; separators or parent
    /// components are rejected before the filesystem is touched.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(TextLensError::InvalidRequest(
                "No file path provided".to_string(),
            ));
        }
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(TextLensError::InvalidRequest(format!(
                "Invalid file reference: {name}"
            )));
        }
        Ok(self.root.join(name))
    }
}

/// Claimed extension of an uploaded filename, lowercased. `None` when the
/// name has no dot or nothing after it.
pub fn claimed_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Keep alphanumerics, dot, dash, underscore; everything else (path
/// separators included) becomes `_`.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_matches(['.', '_']).to_string()
}
