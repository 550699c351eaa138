// src/exec/outcome.rs

use std::fmt;

/// Exit code reported for a cancelled run (128 + SIGINT).
pub const CANCELLED_EXIT_CODE: i32 = 130;

/// Terminal result of one scanner execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The scanner exited on its own with this code.
    Completed(i32),
    /// The run was cancelled and the scanner terminated.
    Cancelled,
    /// The process could not be started.
    SpawnFailed(String),
    /// Anything else that went wrong while the process was running.
    Failed(String),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed(0))
    }

    /// Code to exit this process with.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionOutcome::Completed(code) => *code,
            ExecutionOutcome::Cancelled => CANCELLED_EXIT_CODE,
            ExecutionOutcome::SpawnFailed(_) | ExecutionOutcome::Failed(_) => 1,
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Completed(code) => write!(f, "completed with exit code {code}"),
            ExecutionOutcome::Cancelled => f.write_str("cancelled"),
            ExecutionOutcome::SpawnFailed(cause) => write!(f, "failed to start: {cause}"),
            ExecutionOutcome::Failed(cause) => write!(f, "failed: {cause}"),
        }
    }
}
