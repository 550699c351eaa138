// tests/config_validation.rs

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use scanrun::config::{load_and_validate, parse_str};
use scanrun::config::model::{DEFAULT_SHELL_SCRIPT_URL, DEFAULT_TIMEOUT_SECS};
use scanrun::env::{Credentials, EnvironmentVariableSet};
use scanrun::errors::ScanError;
use scanrun::platform::{ArtifactDownloader, CredentialStore, LocalArtifactCache, StaticCredentialStore};
use scanrun::types::{ScriptInterpreter, StrategyKind};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str, needle: &str) {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(ScanError::Config(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} should mention {needle:?}")
        }
        Err(e) => panic!("Expected Config error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn full_config_loads_with_defaults_applied() {
    let file = write_config(
        r#"
[run]
strategy = "packaged-script"
script_path = "/opt/detect.sh"
interpreter = "bash"
properties = """
--detect.project.name=demo
--detect.source.path=$WORKSPACE
"""

[server.backend]
url = "https://bd.example.com"
credentials_id = "bd-token"
trust_certificates = true

[server.secondary]
url = "https://polaris.example.com"
credentials_id = "polaris"
timeout = 30

[proxy]
host = "proxy.internal"
port = 3128
credentials_id = "proxy-user"
no_proxy_hosts = ["*.internal"]

[credentials.bd-token]
token_env = "BD_TOKEN"

[credentials.polaris]
token = "literal"

[credentials.proxy-user]
username = "svc"
password_env = "PROXY_PASSWORD"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.run.strategy, StrategyKind::PackagedScript);
    assert_eq!(cfg.run.script_path, Some(PathBuf::from("/opt/detect.sh")));
    assert_eq!(cfg.run.interpreter, Some(ScriptInterpreter::Bash));
    assert!(cfg.run.properties.contains("--detect.project.name=demo"));
    assert_eq!(cfg.download.shell_script_url, DEFAULT_SHELL_SCRIPT_URL);

    let backend = cfg.server.backend.as_ref().unwrap();
    assert_eq!(backend.timeout, DEFAULT_TIMEOUT_SECS);
    assert!(backend.trust_certificates);
    assert_eq!(cfg.server.secondary.as_ref().unwrap().timeout, 30);

    let proxy = cfg.proxy.as_ref().unwrap();
    assert_eq!(proxy.port, Some(3128));
    assert_eq!(proxy.no_proxy_hosts, vec!["*.internal".to_string()]);
    assert_eq!(cfg.credentials.len(), 3);
}

#[test]
fn empty_config_is_valid() {
    let cfg = load_and_validate(write_config("").path()).unwrap();
    assert_eq!(cfg.run.strategy, StrategyKind::Auto);
    assert!(cfg.server.backend.is_none());
    assert!(cfg.proxy.is_none());
}

#[test]
fn packaged_script_without_path_is_rejected() {
    expect_config_error(
        r#"
[run]
strategy = "packaged-script"
"#,
        "script_path",
    );
}

#[test]
fn zero_timeout_is_rejected() {
    expect_config_error(
        r#"
[server.backend]
url = "https://bd.example.com"
timeout = 0
"#,
        "timeout",
    );
}

#[test]
fn unknown_credentials_reference_is_rejected() {
    expect_config_error(
        r#"
[server.secondary]
credentials_id = "nope"
"#,
        "unknown credentials 'nope'",
    );
}

#[test]
fn proxy_port_without_host_is_rejected() {
    expect_config_error(
        r#"
[proxy]
port = 8080
"#,
        "[proxy].host",
    );
}

#[test]
fn token_proxy_credentials_are_rejected() {
    expect_config_error(
        r#"
[proxy]
host = "proxy"
credentials_id = "tok"

[credentials.tok]
token = "x"
"#,
        "username/password",
    );
}

#[test]
fn invalid_no_proxy_glob_is_rejected() {
    expect_config_error(
        r#"
[proxy]
host = "proxy"
no_proxy_hosts = ["[unclosed"]
"#,
        "no_proxy_hosts",
    );
}

#[test]
fn credentials_with_both_forms_are_rejected() {
    expect_config_error(
        r#"
[credentials.both]
token = "t"
username = "u"
password = "p"
"#,
        "not both",
    );
}

#[test]
fn username_without_password_is_rejected() {
    expect_config_error(
        r#"
[credentials.half]
username = "u"
"#,
        "no password",
    );
}

#[test]
fn empty_credentials_entry_is_rejected() {
    expect_config_error("[credentials.empty]\n", "is empty");
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let result = load_and_validate(write_config("[run\nstrategy = ").path());
    assert!(matches!(result, Err(ScanError::Toml(_))));
}

#[test]
fn unknown_strategy_name_is_a_toml_error() {
    let result = parse_str("[run]\nstrategy = \"teleport\"\n");
    assert!(matches!(result, Err(ScanError::Toml(_))));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("ScanRun.toml"));
    assert!(matches!(result, Err(ScanError::Io(_))));
}

#[test]
fn static_store_reads_secrets_from_environment() {
    let raw = parse_str(
        r#"
[credentials.bd]
token_env = "BD_TOKEN"

[credentials.user]
username = "svc"
password_env = "SVC_PASSWORD"

[credentials.unset]
token_env = "NOT_SET_ANYWHERE"
"#,
    )
    .unwrap();
    let env: EnvironmentVariableSet = [("BD_TOKEN", "from-env"), ("SVC_PASSWORD", "pw")]
        .into_iter()
        .collect();
    let store = StaticCredentialStore::new(raw.credentials, env);

    match store.credentials("bd").unwrap() {
        Credentials::ApiToken(token) => assert_eq!(token.expose(), "from-env"),
        other => panic!("expected token, got {other:?}"),
    }
    match store.credentials("user").unwrap() {
        Credentials::UsernamePassword { username, password } => {
            assert_eq!(username, "svc");
            assert_eq!(password.expose(), "pw");
        }
        other => panic!("expected username/password, got {other:?}"),
    }

    match store.credentials("unset") {
        Err(ScanError::CredentialNotFound(msg)) => assert!(msg.contains("NOT_SET_ANYWHERE")),
        other => panic!("expected CredentialNotFound, got {other:?}"),
    }
    assert!(matches!(
        store.credentials("other"),
        Err(ScanError::CredentialNotFound(_))
    ));
}

#[test]
fn artifact_cache_serves_local_files_and_cached_downloads() {
    let dir = tempfile::tempdir().unwrap();
    let cached = dir.path().join("detect.sh");
    std::fs::write(&cached, "#!/bin/bash\n").unwrap();

    let cache = LocalArtifactCache::new(Some(dir.path().to_path_buf()));
    assert_eq!(cache.download_dir(), Some(dir.path()));

    assert_eq!(
        cache.ensure_artifact("https://detect.example.com/detect.sh").unwrap(),
        cached
    );
    assert_eq!(
        cache.ensure_artifact(&format!("file://{}", cached.display())).unwrap(),
        cached
    );
    assert_eq!(cache.ensure_artifact(cached.to_str().unwrap()).unwrap(), cached);

    assert!(matches!(
        cache.ensure_artifact("https://detect.example.com/detect.ps1"),
        Err(ScanError::SetupFailed(_))
    ));
}

#[test]
fn artifact_cache_without_download_dir_cannot_serve_urls() {
    let cache = LocalArtifactCache::new(None);
    assert!(matches!(
        cache.ensure_artifact("https://detect.example.com/detect.sh"),
        Err(ScanError::SetupFailed(_))
    ));
}

#[test]
fn debug_output_never_shows_literal_secrets() {
    let cfg = load_and_validate(
        write_config(
            r#"
[credentials.bd]
token = "tok-literal-123"

[credentials.proxy]
username = "svc"
password = "pw-literal-456"
"#,
        )
        .path(),
    )
    .unwrap();

    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("tok-literal-123"), "{rendered}");
    assert!(!rendered.contains("pw-literal-456"), "{rendered}");
    assert!(rendered.contains("svc"));

    let raw = parse_str("[credentials.bd]\ntoken = \"tok-literal-123\"\n").unwrap();
    assert!(!format!("{raw:?}").contains("tok-literal-123"));
}
