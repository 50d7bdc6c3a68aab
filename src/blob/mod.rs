//! Receipt blob storage behind a narrow trait so services stay agnostic of
//! where bytes land.

use std::fs;
use std::path::PathBuf;

use crate::errors::Result;
use crate::utils::ensure_dir;

/// Stores opaque blobs under logical paths and exposes public URLs for them.
pub trait BlobStore: Send + Sync {
    fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<()>;
    fn public_url(&self, path: &str) -> String;
    fn remove(&self, path: &str) -> Result<()>;
}

/// Filesystem-backed blob store rooted at a directory.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl BlobStore for LocalBlobStore {
    fn upload(&self, path: &str, bytes: &[u8], _content_type: &str) -> Result<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        fs::write(&target, bytes)?;
        tracing::debug!(path, bytes = bytes.len(), "stored blob");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path.trim_start_matches('/'))
    }

    // Removal is idempotent: a missing blob is not an error.
    fn remove(&self, path: &str) -> Result<()> {
        match fs::remove_file(self.resolve(path)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
