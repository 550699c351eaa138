mod common;
use crate::common::{extras, init_tracing};

use scanrun::args::{
    LOGGING_LEVEL_KEY, MandatoryExtras, PLATFORM_VERSION_KEY, PLUGIN_VERSION_KEY, assemble,
    replace_macros, split_command_line, split_fragments,
};
use scanrun::env::{EnvironmentVariableSet, REDACTED};
use scanrun::errors::ScanError;
use scanrun::strategy::escape;
use scanrun::types::LogLevel;

fn jar_prefix() -> Vec<String> {
    vec!["java".into(), "-jar".into(), "/opt/detect.jar".into()]
}

fn logging_args(args: &[String]) -> usize {
    args.iter()
        .filter(|a| a.starts_with(&format!("--{LOGGING_LEVEL_KEY}")))
        .count()
}

#[test]
fn explicit_properties_keep_order_and_get_mandatory_suffix() {
    init_tracing();
    let list = assemble(
        &jar_prefix(),
        escape::identity,
        "--detect.source.path=/tmp --detect.timeout=300",
        &EnvironmentVariableSet::new(),
        &extras(),
    )
    .unwrap();

    assert_eq!(
        list.as_slice(),
        &[
            "java",
            "-jar",
            "/opt/detect.jar",
            "--detect.source.path=/tmp",
            "--detect.timeout=300",
            "--logging.level.com.synopsys.integration=INFO",
            "--detect.phone.home.passthrough.jenkins.version=2.401.3",
            "--detect.phone.home.passthrough.jenkins.plugin.version=9.9.9",
        ]
    );
    assert_eq!(list.diagnostics().len(), 2);
    assert_eq!(list.loggable().len(), 6);
    assert_eq!(logging_args(list.as_slice()), 1);
}

#[test]
fn empty_blob_yields_prefix_logging_and_diagnostics() {
    for blob in ["", "   ", "\n\r\n\t"] {
        let list = assemble(
            &jar_prefix(),
            escape::identity,
            blob,
            &EnvironmentVariableSet::new(),
            &extras(),
        )
        .unwrap();
        assert_eq!(list.len(), jar_prefix().len() + 3, "blob {blob:?}");
        assert_eq!(logging_args(list.as_slice()), 1);
    }
}

#[test]
fn user_logging_level_replaces_synthesized_one() {
    let list = assemble(
        &jar_prefix(),
        escape::identity,
        "--logging.level.com.synopsys.integration=DEBUG --detect.x=1",
        &EnvironmentVariableSet::new(),
        &extras(),
    )
    .unwrap();

    assert_eq!(logging_args(list.as_slice()), 1);
    assert!(list
        .as_slice()
        .contains(&"--logging.level.com.synopsys.integration=DEBUG".to_string()));
    assert!(!list.as_slice().iter().any(|a| a.ends_with("=INFO")));
}

#[test]
fn repeated_logging_level_keeps_the_last() {
    let list = assemble(
        &jar_prefix(),
        escape::identity,
        "--logging.level.com.synopsys.integration=TRACE --a=1 --logging.level.com.synopsys.integration=WARN",
        &EnvironmentVariableSet::new(),
        &extras(),
    )
    .unwrap();

    let loggable = list.loggable();
    assert_eq!(logging_args(loggable), 1);
    assert_eq!(
        &loggable[3..],
        &["--a=1", "--logging.level.com.synopsys.integration=WARN"]
    );
}

#[test]
fn assembling_twice_gives_the_same_single_logging_argument() {
    let env = EnvironmentVariableSet::new();
    let blob = "--detect.project.name=demo";
    let first = assemble(&jar_prefix(), escape::escape_xsi, blob, &env, &extras()).unwrap();
    let second = assemble(&jar_prefix(), escape::escape_xsi, blob, &env, &extras()).unwrap();

    assert_eq!(first, second);
    assert_eq!(logging_args(first.as_slice()), 1);
}

#[test]
fn configured_log_level_is_forwarded() {
    let extras = MandatoryExtras {
        log_level: LogLevel::Trace,
        ..extras()
    };
    let list = assemble(
        &jar_prefix(),
        escape::identity,
        "",
        &EnvironmentVariableSet::new(),
        &extras,
    )
    .unwrap();
    assert_eq!(
        list.loggable().last().unwrap(),
        "--logging.level.com.synopsys.integration=TRACE"
    );
}

#[test]
fn unterminated_quote_is_argument_parse_error() {
    let result = assemble(
        &jar_prefix(),
        escape::identity,
        "--detect.project.name=\"my project",
        &EnvironmentVariableSet::new(),
        &extras(),
    );
    match result {
        Err(ScanError::ArgumentParse(msg)) => assert!(msg.contains("double")),
        other => panic!("expected ArgumentParse, got {other:?}"),
    }
}

#[test]
fn multi_line_blob_is_split_into_fragments() {
    let list = assemble(
        &jar_prefix(),
        escape::identity,
        "--a=1\n--b=2 --c=3\r\n\n--d=4\n",
        &EnvironmentVariableSet::new(),
        &extras(),
    )
    .unwrap();
    assert_eq!(&list.loggable()[3..7], &["--a=1", "--b=2", "--c=3", "--d=4"]);
}

#[test]
fn quoted_value_is_one_argument_escaped_per_strategy() {
    let env = EnvironmentVariableSet::new();
    let blob = "--detect.project.name=\"my project\"";

    let jar = assemble(&jar_prefix(), escape::identity, blob, &env, &extras()).unwrap();
    assert_eq!(jar.as_slice()[3], "--detect.project.name=my project");

    let shell = assemble(&[], escape::escape_xsi, blob, &env, &extras()).unwrap();
    assert_eq!(shell.as_slice()[0], "--detect.project.name\\=my\\ project");

    let ps = assemble(&[], escape::escape_powershell, blob, &env, &extras()).unwrap();
    assert_eq!(ps.as_slice()[0], "--detect.project.name=my` project");
}

#[test]
fn prefix_is_never_escaped() {
    let prefix = vec![
        "powershell".to_string(),
        "\"Import-Module 'C:\\detect.ps1'; detect\"".to_string(),
    ];
    let list = assemble(
        &prefix,
        escape::escape_powershell,
        "",
        &EnvironmentVariableSet::new(),
        &extras(),
    )
    .unwrap();
    assert_eq!(&list.as_slice()[..2], prefix.as_slice());
}

#[test]
fn diagnostic_values_are_escaped_but_keys_are_not() {
    let extras = MandatoryExtras {
        log_level: LogLevel::Info,
        platform_version: "<unknown>".to_string(),
        plugin_version: "1.2.3".to_string(),
    };
    let list = assemble(
        &[],
        escape::escape_xsi,
        "",
        &EnvironmentVariableSet::new(),
        &extras,
    )
    .unwrap();
    assert_eq!(
        list.diagnostics(),
        &[
            format!("--{PLATFORM_VERSION_KEY}=\\<unknown\\>"),
            format!("--{PLUGIN_VERSION_KEY}=1.2.3"),
        ]
    );
}

#[test]
fn macros_are_expanded_from_the_environment() {
    let env: EnvironmentVariableSet = [("WORKSPACE", "/ws/job"), ("detect.name", "demo")]
        .into_iter()
        .collect();
    let list = assemble(
        &[],
        escape::identity,
        "--detect.source.path=$WORKSPACE/src --detect.project.name=${detect.name} --x=$UNDEFINED_VAR",
        &env,
        &extras(),
    )
    .unwrap();
    assert_eq!(
        &list.loggable()[..3],
        &[
            "--detect.source.path=/ws/job/src",
            "--detect.project.name=demo",
            "--x=$UNDEFINED_VAR",
        ]
    );
}

#[test]
fn replace_macros_leaves_plain_text_untouched() {
    let env = EnvironmentVariableSet::new();
    assert_eq!(replace_macros("price is 5$", &env), "price is 5$");
    assert_eq!(replace_macros("no vars", &env), "no vars");
}

#[test]
fn redacted_line_masks_secret_values_and_hides_diagnostics() {
    let mut env = EnvironmentVariableSet::new();
    env.insert_secret("BLACKDUCK_API_TOKEN", "s3cr3t-token");
    let list = assemble(
        &jar_prefix(),
        escape::identity,
        "--blackduck.api.token=$BLACKDUCK_API_TOKEN",
        &env,
        &extras(),
    )
    .unwrap();

    let line = list.redacted_line(&env);
    assert!(!line.contains("s3cr3t-token"));
    assert!(line.contains(REDACTED));
    assert!(!line.contains(PLUGIN_VERSION_KEY));
    assert!(!list.to_string().contains(PLATFORM_VERSION_KEY));
}

#[test]
fn secrets_are_masked_after_shell_escaping() {
    let mut env = EnvironmentVariableSet::new();
    env.insert_secret("BLACKDUCK_PASSWORD", "hunter 2$x");

    for escaper in [escape::escape_xsi, escape::escape_powershell] {
        let list = assemble(
            &[],
            escaper,
            "--blackduck.password=$BLACKDUCK_PASSWORD --detect.project.name=demo",
            &env,
            &extras(),
        )
        .unwrap();

        assert!(list.as_slice()[0].contains("hunter"));
        let line = list.redacted_line(&env);
        assert!(!line.contains("hunter"), "line was {line:?}");
        assert!(line.contains(REDACTED));
        assert!(line.contains("--detect.project.name"));
    }
}

#[test]
fn java_style_logging_property_suppresses_the_synthesized_one() {
    let list = assemble(
        &jar_prefix(),
        escape::identity,
        "-Dlogging.level.com.synopsys.integration=DEBUG --detect.x=1",
        &EnvironmentVariableSet::new(),
        &extras(),
    )
    .unwrap();

    let mentioning: Vec<_> = list
        .as_slice()
        .iter()
        .filter(|a| a.contains(LOGGING_LEVEL_KEY))
        .collect();
    assert_eq!(
        mentioning,
        vec!["-Dlogging.level.com.synopsys.integration=DEBUG"]
    );
    assert!(!list.as_slice().iter().any(|a| a.ends_with("=INFO")));
}

#[test]
fn tokenizer_honours_both_quote_styles() {
    assert_eq!(
        split_command_line("a 'b c' \"d e\"\tf").unwrap(),
        vec!["a", "b c", "d e", "f"]
    );
    assert_eq!(
        split_command_line("--name=\"it's\" '--q=\"x\"'").unwrap(),
        vec!["--name=it's", "--q=\"x\""]
    );
}

#[test]
fn tokenizer_keeps_backslashes_and_empty_quotes() {
    assert_eq!(
        split_command_line("--path=C:\\tools\\scan ''").unwrap(),
        vec!["--path=C:\\tools\\scan", ""]
    );
}

#[test]
fn tokenizer_reports_unterminated_single_quote() {
    assert!(matches!(
        split_command_line("--a='x"),
        Err(ScanError::ArgumentParse(_))
    ));
}

#[test]
fn split_fragments_drops_blank_lines() {
    assert_eq!(
        split_fragments("'--a=1\n\n  \n--b=2'").unwrap(),
        vec!["--a=1", "--b=2"]
    );
}
