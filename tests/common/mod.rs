#![allow(dead_code)]

pub use scanrun_test_utils::{builders, fakes, init_tracing, with_timeout};

use scanrun::args::{ArgumentList, MandatoryExtras, assemble};
use scanrun::env::EnvironmentVariableSet;
use scanrun::strategy::escape;
use scanrun::types::LogLevel;

pub fn extras() -> MandatoryExtras {
    MandatoryExtras {
        log_level: LogLevel::Info,
        platform_version: "2.401.3".to_string(),
        plugin_version: "9.9.9".to_string(),
    }
}

/// A command line made of `prefix` plus the mandatory trailing arguments.
pub fn command(prefix: &[&str]) -> ArgumentList {
    let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
    assemble(
        &prefix,
        escape::identity,
        "",
        &EnvironmentVariableSet::new(),
        &extras(),
    )
    .expect("assembling a fixed command line")
}
