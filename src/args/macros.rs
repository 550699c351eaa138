// src/args/macros.rs

//! `$VAR` / `${VAR}` substitution against the run's environment.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use crate::env::EnvironmentVariableSet;

static MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z0-9_]+|\{[A-Za-z0-9_.]+\})").expect("macro pattern is valid")
});

/// Replace every known variable reference; unknown ones stay as written.
pub fn replace_macros<'a>(value: &'a str, env: &EnvironmentVariableSet) -> Cow<'a, str> {
    MACRO.replace_all(value, |caps: &Captures<'_>| {
        let name = caps[1].trim_start_matches('{').trim_end_matches('}');
        match env.get(name) {
            Some(v) => v.to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// [`replace_macros`], warning when a `$` survives substitution.
///
/// A leftover `$` is allowed (it may be literal), so this never fails. Only
/// the text as written is logged, never the substituted values.
pub fn expand_fragment(fragment: &str, env: &EnvironmentVariableSet) -> String {
    let expanded = replace_macros(fragment, env);
    if !expanded.trim().is_empty() && expanded.contains('$') {
        warn!(
            argument = %fragment,
            "variable may not have been replaced; make sure it is defined"
        );
    }
    expanded.into_owned()
}
