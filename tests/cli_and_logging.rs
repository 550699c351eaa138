use clap::Parser;

use scanrun::cli::CliArgs;
use scanrun::logging::effective_level;
use scanrun::types::{LogLevel, OsKind, StrategyKind};

#[test]
fn cli_flag_wins_over_env_var() {
    assert_eq!(
        effective_level(Some(LogLevel::Warn), Some("trace")),
        LogLevel::Warn
    );
}

#[test]
fn env_var_is_used_when_no_flag_is_given() {
    assert_eq!(effective_level(None, Some("DEBUG")), LogLevel::Debug);
    assert_eq!(effective_level(None, Some("warning")), LogLevel::Warn);
}

#[test]
fn unparsable_env_var_falls_back_to_info() {
    assert_eq!(effective_level(None, Some("loud")), LogLevel::Info);
    assert_eq!(effective_level(None, None), LogLevel::Info);
}

#[test]
fn log_level_maps_to_scanner_property_value() {
    assert_eq!(LogLevel::Error.as_property_value(), "ERROR");
    assert_eq!(LogLevel::Trace.as_property_value(), "TRACE");
}

#[test]
fn cli_parses_all_flags() {
    let args = CliArgs::try_parse_from([
        "scanrun",
        "--config",
        "ci/ScanRun.toml",
        "--properties",
        "--detect.project.name=demo --detect.timeout=300",
        "--strategy",
        "local-jar",
        "--workspace",
        "/ws",
        "--log-level",
        "debug",
        "--dry-run",
    ])
    .unwrap();

    assert_eq!(args.config.as_deref(), Some("ci/ScanRun.toml"));
    assert_eq!(
        args.properties.as_deref(),
        Some("--detect.project.name=demo --detect.timeout=300")
    );
    assert_eq!(args.strategy, Some(StrategyKind::LocalJar));
    assert_eq!(args.workspace.as_deref(), Some("/ws"));
    assert_eq!(args.log_level, Some(LogLevel::Debug));
    assert!(args.dry_run);
}

#[test]
fn cli_defaults_are_empty() {
    let args = CliArgs::try_parse_from(["scanrun"]).unwrap();
    assert!(args.config.is_none());
    assert!(args.strategy.is_none());
    assert!(!args.dry_run);
}

#[test]
fn os_kind_parses_common_names() {
    assert_eq!("Darwin".parse::<OsKind>(), Ok(OsKind::Mac));
    assert_eq!("windows".parse::<OsKind>(), Ok(OsKind::Windows));
    assert!("plan9".parse::<OsKind>().is_err());
}
