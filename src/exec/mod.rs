// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`process`] spawns the scanner with `tokio::process::Command`, drains
//!   its output concurrently and handles cancellation.
//! - [`sink`] defines where that output goes.
//! - [`host`] provides the `ExecutionHost` trait and the `LocalHost` the
//!   binary uses, which tests replace with a fake.
//! - [`outcome`] is the terminal result of a run.

pub mod host;
pub mod outcome;
pub mod process;
pub mod sink;

pub use host::{ExecutionHost, LocalHost};
pub use outcome::{CANCELLED_EXIT_CODE, ExecutionOutcome};
pub use process::ProcessExecutor;
pub use sink::{ConsoleJobLog, JobLog, OutputStream};
