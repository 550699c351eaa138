// src/exec/sink.rs

//! Destination for the scanner's output.

use std::io::Write;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// The job log the scanner's output is copied into.
///
/// Writes arrive as raw chunks in the order they were read from each pipe.
pub trait JobLog: Send + Sync {
    fn write(&self, stream: OutputStream, bytes: &[u8]);
}

/// Copies scanner stdout/stderr to this process's stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleJobLog;

impl JobLog for ConsoleJobLog {
    fn write(&self, stream: OutputStream, bytes: &[u8]) {
        let result = match stream {
            OutputStream::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(bytes).and_then(|_| out.flush())
            }
            OutputStream::Stderr => {
                let mut err = std::io::stderr().lock();
                err.write_all(bytes).and_then(|_| err.flush())
            }
        };
        if let Err(e) = result {
            warn!(?stream, error = %e, "failed to write scanner output");
        }
    }
}
