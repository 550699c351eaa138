// src/exec/host.rs

//! Pluggable execution host abstraction.
//!
//! The runner talks to an `ExecutionHost` instead of spawning processes
//! itself. The host is the machine the scanner actually runs on: it runs
//! the strategy's setup action and launches the process there.
//!
//! - `LocalHost` runs everything on the current machine and is what the
//!   `scanrun` binary uses (it is itself started on the CI worker).
//! - Tests provide their own `ExecutionHost` that records what would have
//!   been launched without spawning anything.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::args::ArgumentList;
use crate::env::EnvironmentVariableSet;
use crate::errors::Result;
use crate::platform::ArtifactDownloader;
use crate::strategy::{ExecutionStrategy, PreparedInvocation};

use super::outcome::ExecutionOutcome;
use super::process::ProcessExecutor;

/// Trait abstracting where the scanner is prepared and executed.
pub trait ExecutionHost: Send + Sync {
    /// Run the strategy's setup action on this host.
    fn prepare(
        &self,
        strategy: &ExecutionStrategy,
        env: &EnvironmentVariableSet,
    ) -> Result<PreparedInvocation>;

    /// Start the scanner and wait for its outcome.
    fn launch<'a>(
        &'a self,
        args: &'a ArgumentList,
        env: &'a EnvironmentVariableSet,
        cwd: &'a Path,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ExecutionOutcome> + Send + 'a>>;
}

/// Host backed by the current machine.
pub struct LocalHost {
    executor: ProcessExecutor,
    downloader: Arc<dyn ArtifactDownloader>,
}

impl LocalHost {
    pub fn new(executor: ProcessExecutor, downloader: Arc<dyn ArtifactDownloader>) -> Self {
        Self {
            executor,
            downloader,
        }
    }
}

impl ExecutionHost for LocalHost {
    fn prepare(
        &self,
        strategy: &ExecutionStrategy,
        env: &EnvironmentVariableSet,
    ) -> Result<PreparedInvocation> {
        strategy.setup(env, self.downloader.as_ref())
    }

    fn launch<'a>(
        &'a self,
        args: &'a ArgumentList,
        env: &'a EnvironmentVariableSet,
        cwd: &'a Path,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ExecutionOutcome> + Send + 'a>> {
        Box::pin(self.executor.execute(args, env, cwd, cancel))
    }
}
