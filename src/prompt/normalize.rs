//! Comma cleanup applied to expanded prompts

use regex::Regex;
use std::sync::LazyLock;

// Pattern is a compile-time constant
#[allow(clippy::expect_used)]
static REPEATED_COMMAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(",{2,}").expect("comma pattern is valid"));

/// Collapse comma runs and strip one leading and one trailing comma
///
/// Only commas are touched; whitespace and `{word}` tokens pass through.
pub fn normalize_commas(text: &str) -> String {
    let collapsed = REPEATED_COMMAS.replace_all(text, ",");
    let trimmed = collapsed.strip_prefix(',').unwrap_or(&*collapsed);
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed);
    trimmed.to_string()
}
