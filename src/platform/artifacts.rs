// src/platform/artifacts.rs

//! Artifact manager that only looks at the local filesystem.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{Result, ScanError};

use super::ArtifactDownloader;

/// Resolves artifacts without network access.
///
/// - `file://` URLs and plain paths must point at an existing file.
/// - `http(s)://` URLs resolve to a file of the same name in the download
///   directory, which an earlier job step is expected to have filled.
#[derive(Debug, Clone, Default)]
pub struct LocalArtifactCache {
    download_dir: Option<PathBuf>,
}

impl LocalArtifactCache {
    pub fn new(download_dir: Option<PathBuf>) -> Self {
        Self { download_dir }
    }

    fn cached_copy(&self, url: &str) -> Result<PathBuf> {
        let name = url
            .rsplit('/')
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ScanError::SetupFailed(format!("cannot derive a file name from {url}")))?;

        let dir = self.download_dir.as_ref().ok_or_else(|| {
            ScanError::SetupFailed(format!(
                "{url} is not available locally and no download directory is configured"
            ))
        })?;

        let path = dir.join(name);
        if path.is_file() {
            debug!(url, path = %path.display(), "using cached artifact");
            Ok(path)
        } else {
            Err(ScanError::SetupFailed(format!(
                "{url} has not been downloaded to {}",
                dir.display()
            )))
        }
    }
}

impl ArtifactDownloader for LocalArtifactCache {
    fn ensure_artifact(&self, url: &str) -> Result<PathBuf> {
        let url = url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.cached_copy(url);
        }

        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        if path.is_file() {
            Ok(path)
        } else {
            Err(ScanError::SetupFailed(format!(
                "artifact {} does not exist",
                path.display()
            )))
        }
    }

    fn download_dir(&self) -> Option<&Path> {
        self.download_dir.as_deref()
    }
}
