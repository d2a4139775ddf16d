//! URI template expansion.
//!
//! Templates carry literal `$1` / `$2` tokens. Expansion is purely textual:
//! no URL encoding and no check that the result is a well-formed URI.

/// Placeholder for a local identifier in provider templates, and for the
/// prefix in resolver templates.
pub const PLACEHOLDER_FIRST: &str = "$1";
/// Placeholder for the local identifier in resolver templates.
pub const PLACEHOLDER_SECOND: &str = "$2";

/// Replaces every `token` occurrence in `template` with its value in one pass.
///
/// Substituted text is never rescanned, so values containing `$1`/`$2`
/// are emitted verbatim. Tokens are tried in the given order at each
/// position; empty tokens are ignored.
pub fn expand(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while !rest.is_empty() {
        for (token, value) in substitutions {
            if token.is_empty() {
                continue;
            }
            if let Some(tail) = rest.strip_prefix(token) {
                expanded.push_str(value);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            expanded.push(c);
        }
        rest = chars.as_str();
    }
    expanded
}

/// Expands a provider template (`$1` = local identifier).
pub fn expand_provider(template: &str, local_id: &str) -> String {
    expand(template, &[(PLACEHOLDER_FIRST, local_id)])
}

/// Expands a resolver template (`$1` = prefix, `$2` = identifier).
pub fn expand_resolver(template: &str, prefix: &str, identifier: &str) -> String {
    expand(
        template,
        &[(PLACEHOLDER_FIRST, prefix), (PLACEHOLDER_SECOND, identifier)],
    )
}

pub fn has_placeholder(template: &str, placeholder: &str) -> bool {
    template.contains(placeholder)
}

/// Returns whether the template ends with the local identifier slot.
pub fn ends_with_placeholder(template: &str) -> bool {
    template.ends_with(PLACEHOLDER_FIRST)
}
