//! Colour decision for formatter output

use is_terminal::IsTerminal;
use std::env;
use std::ffi::OsString;
use std::io::stdout;

/// Variables set by common CI runners, which may allocate a TTY that
/// cannot render colour reliably
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "TF_BUILD",
];

/// Whether stats output should be coloured for the current process
pub fn should_use_color(color_enabled: bool) -> bool {
    color_decision(color_enabled, stdout().is_terminal(), |name| env::var_os(name))
}

/// Decide on colour from the config switch, TTY state and environment
///
/// Precedence: config off, then `NO_COLOR`, then `CLICOLOR_FORCE`, then
/// terminal capability.
fn color_decision(
    color_enabled: bool,
    is_tty: bool,
    var: impl Fn(&str) -> Option<OsString>,
) -> bool {
    if !color_enabled || var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    if var("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
        return true;
    }
    if !is_tty || CI_VARS.iter().any(|name| var(name).is_some()) {
        return false;
    }
    !matches!(var("TERM"), Some(term) if term == "dumb")
}
