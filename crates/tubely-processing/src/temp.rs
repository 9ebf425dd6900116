//! Scoped temp files for staged uploads.
//!
//! A [`TempArtifact`] deletes its path when dropped, on every exit path of the
//! request that owns it, including cancellation. Deleting a path that was never
//! created is a no-op.

use std::io;
use std::path::{Path, PathBuf};

/// A local file owned by one request and removed on drop.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Create a new, uniquely named empty file in `dir` and take ownership of it.
    ///
    /// Returns the guard and an open handle for writing.
    pub fn create_in(
        dir: &Path,
        prefix: &str,
        suffix: &str,
    ) -> io::Result<(Self, tokio::fs::File)> {
        let (file, path) = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir)?
            .keep()
            .map_err(|e| e.error)?;
        Ok((Self { path }, tokio::fs::File::from_std(file)))
    }

    /// Take ownership of a path that may or may not exist yet, such as the
    /// output of an external tool that has not run.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed temp artifact");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to remove temp artifact"
                );
            }
        }
    }
}
