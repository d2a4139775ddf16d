//! Identifier pattern helpers.
//!
//! Patterns use the `regex` crate dialect (RE2-style): look-around and
//! back-references are not supported and fail to compile.

use regex::Regex;

/// Anchors a pattern at both ends.
///
/// Fully anchored patterns are returned unchanged. Otherwise the body is
/// wrapped in a non-capturing group when it has a top-level alternation, so
/// `a|bc` becomes `^(?:a|bc)$`.
pub fn anchor(pattern: &str) -> String {
    let has_start = pattern.starts_with('^');
    let has_end = ends_with_anchor(pattern);
    if has_start && has_end {
        return pattern.to_string();
    }
    let body = if has_start { &pattern[1..] } else { pattern };
    let body = if has_end {
        &body[..body.len() - 1]
    } else {
        body
    };
    if has_top_level_alternation(body) {
        format!("^(?:{body})$")
    } else {
        format!("^{body}$")
    }
}

/// A trailing `$` is an anchor unless an odd run of backslashes escapes it.
fn ends_with_anchor(pattern: &str) -> bool {
    let Some(head) = pattern.strip_suffix('$') else {
        return false;
    };
    head.chars().rev().take_while(|c| *c == '\\').count() % 2 == 0
}

fn has_top_level_alternation(body: &str) -> bool {
    let mut depth = 0usize;
    let mut in_class = false;
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => depth = depth.saturating_sub(1),
            '|' if !in_class && depth == 0 => return true,
            _ => {}
        }
    }
    false
}

pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)
}

/// Returns whether `regex` matches a prefix of `text` starting at offset 0.
pub fn matches_at_start(regex: &Regex, text: &str) -> bool {
    regex.find(text).is_some_and(|found| found.start() == 0)
}
