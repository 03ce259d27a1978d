//! Log redaction for request URLs.
//!
//! The remote fetcher attaches session credentials as query parameters
//! (`secret`, `key`); these helpers scrub such values before a URL is
//! logged.

use std::borrow::Cow;

/// Query parameters whose values must never reach the log.
const SENSITIVE_PATTERNS: &[(&str, &str)] = &[
    ("secret=", "secret=[REDACTED]"),
    ("key=", "key=[REDACTED]"),
    ("password=", "password=[REDACTED]"),
    ("email=", "email=[REDACTED]"),
];

/// Redact sensitive query-parameter values from a string.
pub fn redact_secrets(input: &str) -> Cow<'_, str> {
    let mut result = Cow::Borrowed(input);

    for (pattern, replacement) in SENSITIVE_PATTERNS {
        if result.contains(pattern) {
            let redacted = redact_pattern_value(&result, pattern, replacement);
            result = Cow::Owned(redacted);
        }
    }

    result
}

/// Redact the value following a pattern, up to the next delimiter.
fn redact_pattern_value(input: &str, pattern: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut remaining = input;

    while let Some(pos) = remaining.find(pattern) {
        result.push_str(&remaining[..pos]);
        result.push_str(replacement);

        let after_pattern = &remaining[pos + pattern.len()..];
        let end = after_pattern
            .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
            .unwrap_or(after_pattern.len());

        remaining = &after_pattern[end..];
    }

    result.push_str(remaining);
    result
}

/// Check if a string contains any sensitive patterns.
pub fn contains_sensitive(input: &str) -> bool {
    SENSITIVE_PATTERNS
        .iter()
        .any(|(pattern, _)| input.contains(pattern))
}
