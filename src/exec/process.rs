// src/exec/process.rs

//! Scanner process runner.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::args::ArgumentList;
use crate::env::EnvironmentVariableSet;

use super::outcome::ExecutionOutcome;
use super::sink::{JobLog, OutputStream};

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Runs one scanner process and copies its output to a [`JobLog`].
#[derive(Clone)]
pub struct ProcessExecutor {
    sink: Arc<dyn JobLog>,
    grace: Duration,
}

impl ProcessExecutor {
    /// `grace` is how long a cancelled process gets between SIGTERM and
    /// SIGKILL.
    pub fn new(sink: Arc<dyn JobLog>, grace: Duration) -> Self {
        Self { sink, grace }
    }

    /// Spawn `args` in `cwd` with `env` layered over the inherited
    /// environment, and wait for it.
    ///
    /// - stdout and stderr are drained by their own tasks from the moment
    ///   the process starts, so a chatty child never blocks on a full pipe.
    /// - If `cancel` fires, the process is terminated, the drain tasks are
    ///   stopped, and `Cancelled` is returned.
    pub async fn execute(
        &self,
        args: &ArgumentList,
        env: &EnvironmentVariableSet,
        cwd: &Path,
        cancel: CancellationToken,
    ) -> ExecutionOutcome {
        let Some((program, rest)) = args.as_slice().split_first() else {
            return ExecutionOutcome::SpawnFailed("empty command line".to_string());
        };
        if cancel.is_cancelled() {
            info!("run cancelled before the scanner was started");
            return ExecutionOutcome::Cancelled;
        }

        let mut cmd = Command::new(program);
        cmd.args(rest)
            .current_dir(cwd)
            .envs(env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so termination also reaches whatever a
        // wrapper script started.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(program = %program, cwd = %cwd.display(), error = %e, "failed to start scanner");
                return ExecutionOutcome::SpawnFailed(format!("starting {program}: {e}"));
            }
        };
        info!(pid = ?child.id(), program = %program, "scanner process started");

        let stop_drains = CancellationToken::new();
        let mut drains = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            drains.push(self.spawn_drain(stdout, OutputStream::Stdout, &stop_drains));
        }
        if let Some(stderr) = child.stderr.take() {
            drains.push(self.spawn_drain(stderr, OutputStream::Stderr, &stop_drains));
        }

        tokio::select! {
            status = child.wait() => {
                match status {
                    Ok(status) => {
                        let code = exit_code(status);
                        info!(exit_code = code, success = status.success(), "scanner process exited");
                        finish_drains(drains, &stop_drains, &cancel).await;
                        ExecutionOutcome::Completed(code)
                    }
                    Err(e) => {
                        error!(error = %e, "waiting for scanner process failed");
                        stop_drains.cancel();
                        join_drains(drains).await;
                        ExecutionOutcome::Failed(format!("waiting for scanner process: {e}"))
                    }
                }
            }

            _ = cancel.cancelled() => {
                warn!(pid = ?child.id(), "run cancelled; terminating scanner process");
                terminate(&mut child, self.grace).await;
                stop_drains.cancel();
                join_drains(drains).await;
                ExecutionOutcome::Cancelled
            }
        }
    }

    fn spawn_drain<R>(
        &self,
        reader: R,
        stream: OutputStream,
        stop: &CancellationToken,
    ) -> JoinHandle<u64>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(drain(reader, stream, Arc::clone(&self.sink), stop.clone()))
    }
}

/// Copy `reader` into the sink until EOF, a read error, or `stop`.
async fn drain<R>(
    mut reader: R,
    stream: OutputStream,
    sink: Arc<dyn JobLog>,
    stop: CancellationToken,
) -> u64
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            read = reader.read(&mut buf) => match read {
                Ok(0) => break,
                Ok(n) => {
                    sink.write(stream, &buf[..n]);
                    total += n as u64;
                }
                Err(e) => {
                    warn!(?stream, error = %e, "reading scanner output failed");
                    break;
                }
            }
        }
    }
    debug!(?stream, bytes = total, "output drain finished");
    total
}

/// After a normal exit the pipes hit EOF on their own, unless a background
/// process inherited them; a cancel still stops the wait.
async fn finish_drains(
    drains: Vec<JoinHandle<u64>>,
    stop: &CancellationToken,
    cancel: &CancellationToken,
) {
    let stopper = {
        let stop = stop.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            cancel.cancelled().await;
            stop.cancel();
        })
    };
    join_drains(drains).await;
    stopper.abort();
}

async fn join_drains(drains: Vec<JoinHandle<u64>>) {
    for handle in drains {
        if let Err(e) = handle.await {
            warn!(error = %e, "output drain task failed");
        }
    }
}

async fn terminate(child: &mut Child, grace: Duration) {
    #[cfg(unix)]
    {
        use nix::sys::signal::Signal;

        if let Some(pid) = child.id() {
            signal_group(pid, Signal::SIGTERM);
            if tokio::time::timeout(grace, child.wait()).await.is_ok() {
                return;
            }
            warn!(pid, grace_secs = grace.as_secs(), "scanner ignored SIGTERM; killing");
            signal_group(pid, Signal::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    let _ = grace;

    if let Err(e) = child.kill().await {
        warn!(error = %e, "failed to kill scanner process");
    }
}

#[cfg(unix)]
fn signal_group(pid: u32, signal: nix::sys::signal::Signal) {
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    if let Err(e) = killpg(Pid::from_raw(pid as i32), signal) {
        debug!(pid, ?signal, error = %e, "signalling scanner process group failed");
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
