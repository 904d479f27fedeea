use std::sync::OnceLock;

use regex::Regex;

/// Collapse every run of two or more whitespace characters to one space and trim.
pub fn collapse_whitespace(css: &str) -> String {
    static RUNS: OnceLock<Regex> = OnceLock::new();
    let re = RUNS.get_or_init(|| Regex::new(r"\s\s+").unwrap());
    re.replace_all(css, " ").trim().to_string()
}

/// A bare `0` is not a length inside `calc()`; give it a unit.
pub fn calc_length(value: &str) -> &str {
    if value == "0" {
        "0px"
    } else {
        value
    }
}
