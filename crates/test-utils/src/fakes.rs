#![allow(dead_code)]

//! Fake collaborators: nothing here touches the network or spawns a
//! scanner.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use scanrun::args::ArgumentList;
use scanrun::env::{Credentials, EnvironmentVariableSet, Secret};
use scanrun::errors::{Result, ScanError};
use scanrun::exec::{ExecutionHost, ExecutionOutcome, JobLog, OutputStream};
use scanrun::platform::{ArtifactDownloader, CiPlatform, CredentialStore};
use scanrun::strategy::{ExecutionStrategy, PreparedInvocation};
use scanrun::types::OsKind;

/// Platform with fixed answers.
#[derive(Debug, Clone)]
pub struct FakePlatform {
    pub os: OsKind,
    pub workspace: PathBuf,
    pub plugin_version: Option<String>,
    pub platform_version: Option<String>,
    pub variables: Vec<(String, String)>,
}

impl FakePlatform {
    pub fn new(os: OsKind) -> Self {
        Self {
            os,
            workspace: PathBuf::from("/workspace/job"),
            plugin_version: Some("9.9.9".to_string()),
            platform_version: Some("2.401.3".to_string()),
            variables: vec![("WORKSPACE".to_string(), "/workspace/job".to_string())],
        }
    }

    pub fn linux() -> Self {
        Self::new(OsKind::Linux)
    }

    pub fn windows() -> Self {
        Self::new(OsKind::Windows)
    }

    pub fn with_variable(mut self, key: &str, value: &str) -> Self {
        self.variables.push((key.to_string(), value.to_string()));
        self
    }

    pub fn without_versions(mut self) -> Self {
        self.plugin_version = None;
        self.platform_version = None;
        self
    }
}

impl CiPlatform for FakePlatform {
    fn remote_operating_system(&self) -> OsKind {
        self.os
    }

    fn working_directory(&self) -> Result<PathBuf> {
        Ok(self.workspace.clone())
    }

    fn plugin_version(&self) -> Option<String> {
        self.plugin_version.clone()
    }

    fn platform_version(&self) -> Option<String> {
        self.platform_version.clone()
    }

    fn environment(&self) -> Vec<(String, String)> {
        self.variables.clone()
    }
}

/// In-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct MapCredentialStore {
    entries: HashMap<String, Credentials>,
}

impl MapCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, id: &str, token: &str) -> Self {
        self.entries
            .insert(id.to_string(), Credentials::ApiToken(Secret::new(token)));
        self
    }

    pub fn with_user(mut self, id: &str, username: &str, password: &str) -> Self {
        self.entries.insert(
            id.to_string(),
            Credentials::UsernamePassword {
                username: username.to_string(),
                password: Secret::new(password),
            },
        );
        self
    }
}

impl CredentialStore for MapCredentialStore {
    fn credentials(&self, id: &str) -> Result<Credentials> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| ScanError::CredentialNotFound(format!("no credentials with id '{id}'")))
    }
}

/// Downloader that serves preconfigured URLs and records every request.
#[derive(Debug, Clone, Default)]
pub struct FakeDownloader {
    artifacts: HashMap<String, PathBuf>,
    download_dir: Option<PathBuf>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serving(mut self, url: &str, path: impl Into<PathBuf>) -> Self {
        self.artifacts.insert(url.to_string(), path.into());
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl ArtifactDownloader for FakeDownloader {
    fn ensure_artifact(&self, url: &str) -> Result<PathBuf> {
        self.requested.lock().unwrap().push(url.to_string());
        self.artifacts
            .get(url)
            .cloned()
            .ok_or_else(|| ScanError::SetupFailed(format!("download of {url} failed")))
    }

    fn download_dir(&self) -> Option<&Path> {
        self.download_dir.as_deref()
    }
}

/// What a [`RecordingHost`] was asked to launch.
#[derive(Debug, Clone)]
pub struct LaunchRecord {
    pub args: Vec<String>,
    pub env: EnvironmentVariableSet,
    pub cwd: PathBuf,
}

/// Execution host that runs setup for real (against a [`FakeDownloader`])
/// but only records launches.
pub struct RecordingHost {
    downloader: FakeDownloader,
    outcome: ExecutionOutcome,
    wait_for_cancel: bool,
    pub launched: Arc<Mutex<Vec<LaunchRecord>>>,
}

impl RecordingHost {
    pub fn new(downloader: FakeDownloader) -> Self {
        Self {
            downloader,
            outcome: ExecutionOutcome::Completed(0),
            wait_for_cancel: false,
            launched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_outcome(mut self, outcome: ExecutionOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Make `launch` behave like a scanner that runs until cancelled.
    pub fn until_cancelled(mut self) -> Self {
        self.wait_for_cancel = true;
        self
    }

    pub fn launches(&self) -> Vec<LaunchRecord> {
        self.launched.lock().unwrap().clone()
    }
}

impl ExecutionHost for RecordingHost {
    fn prepare(
        &self,
        strategy: &ExecutionStrategy,
        env: &EnvironmentVariableSet,
    ) -> Result<PreparedInvocation> {
        strategy.setup(env, &self.downloader)
    }

    fn launch<'a>(
        &'a self,
        args: &'a ArgumentList,
        env: &'a EnvironmentVariableSet,
        cwd: &'a Path,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ExecutionOutcome> + Send + 'a>> {
        let record = LaunchRecord {
            args: args.as_slice().to_vec(),
            env: env.clone(),
            cwd: cwd.to_path_buf(),
        };
        let launched = Arc::clone(&self.launched);
        let outcome = self.outcome.clone();
        let wait_for_cancel = self.wait_for_cancel;

        Box::pin(async move {
            launched.lock().unwrap().push(record);
            if wait_for_cancel {
                cancel.cancelled().await;
                return ExecutionOutcome::Cancelled;
            }
            outcome
        })
    }
}

/// Job log that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    stdout: Mutex<Vec<u8>>,
    stderr: Mutex<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn stdout_bytes(&self) -> usize {
        self.stdout.lock().unwrap().len()
    }

    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout.lock().unwrap()).into_owned()
    }

    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr.lock().unwrap()).into_owned()
    }
}

impl JobLog for MemorySink {
    fn write(&self, stream: OutputStream, bytes: &[u8]) {
        let target = match stream {
            OutputStream::Stdout => &self.stdout,
            OutputStream::Stderr => &self.stderr,
        };
        target.lock().unwrap().extend_from_slice(bytes);
    }
}
