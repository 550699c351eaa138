// src/platform/mod.rs

//! Collaborators the runner depends on but does not own.
//!
//! - [`CiPlatform`]: facts about the CI job and its execution host.
//! - [`CredentialStore`]: turns a credentials id into secrets.
//! - [`ArtifactDownloader`]: turns an artifact URL into a local file.
//!
//! Local implementations live in [`local`], [`credentials`] and
//! [`artifacts`]; tests swap in fakes from `scanrun-test-utils`.

pub mod artifacts;
pub mod credentials;
pub mod local;

use std::path::{Path, PathBuf};

use crate::env::Credentials;
use crate::errors::Result;
use crate::types::OsKind;

pub use artifacts::LocalArtifactCache;
pub use credentials::StaticCredentialStore;
pub use local::LocalPlatform;

/// Version string reported when the platform cannot tell.
pub const UNKNOWN_VERSION: &str = "<unknown>";

pub trait CiPlatform: Send + Sync {
    /// OS family of the host the scanner will run on.
    fn remote_operating_system(&self) -> OsKind;

    /// Directory the scanner runs in (the job workspace).
    fn working_directory(&self) -> Result<PathBuf>;

    /// Version of this integration.
    fn plugin_version(&self) -> Option<String>;

    /// Version of the CI platform itself.
    fn platform_version(&self) -> Option<String>;

    /// Variables the CI platform defines for the job.
    fn environment(&self) -> Vec<(String, String)>;
}

pub trait CredentialStore: Send + Sync {
    /// Look up credentials by id.
    ///
    /// Fails with `ScanError::CredentialNotFound` for unknown ids.
    fn credentials(&self, id: &str) -> Result<Credentials>;
}

pub trait ArtifactDownloader: Send + Sync {
    /// Return a local path for the artifact at `url`, fetching or reusing a
    /// cached copy as needed.
    fn ensure_artifact(&self, url: &str) -> Result<PathBuf>;

    /// Directory artifacts are cached in, if any.
    fn download_dir(&self) -> Option<&Path>;
}
