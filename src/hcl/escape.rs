//! Escaping policy for free text written into HCL.
//!
//! Every user-supplied string that ends up inside a quoted literal goes
//! through [`escape_string`]; nothing is interpolated raw. Template
//! sequences are doubled so that `${...}` typed by a user stays literal.

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("Invalid identifier regex")
});

/// Escape a string for use inside a double-quoted HCL literal.
pub fn escape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }

    out
}

/// Quote and escape a string.
pub fn quote(raw: &str) -> String {
    format!("\"{}\"", escape_string(raw))
}

/// Flatten text for a `#` comment: line breaks become spaces.
pub fn sanitize_comment(raw: &str) -> String {
    raw.split(['\n', '\r'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect()
}

/// Whether a key can be written bare (otherwise it must be quoted).
pub fn is_identifier(key: &str) -> bool {
    IDENTIFIER_REGEX.is_match(key)
}

/// Render a map or attribute key, quoting it when needed.
pub fn render_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_string_unchanged() {
        assert_eq!(escape_string("10.0.0.0/16"), "10.0.0.0/16");
    }

    #[test]
    fn test_quotes_and_backslashes() {
        assert_eq!(escape_string(r#"say "hi"\now"#), r#"say \"hi\"\\now"#);
    }

    #[test]
    fn test_newlines_and_tabs() {
        assert_eq!(
            escape_string("#!/bin/bash\napt-get update\r\n\tdone"),
            "#!/bin/bash\\napt-get update\\r\\n\\tdone"
        );
    }

    #[test]
    fn test_template_sequences_are_literal() {
        assert_eq!(escape_string("${var.x} and %{if}"), "$${var.x} and %%{if}");
        assert_eq!(escape_string("cost $5 at 50%"), "cost $5 at 50%");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(escape_string("a\u{7}b"), "a\\u0007b");
    }

    #[test]
    fn test_comment_sanitizing() {
        assert_eq!(sanitize_comment("line one\nline two\r\n"), "line one line two");
    }

    #[test]
    fn test_keys() {
        assert_eq!(render_key("environment"), "environment");
        assert_eq!(render_key("us-east1"), "us-east1");
        assert_eq!(
            render_key("autoscaling.knative.dev/maxScale"),
            "\"autoscaling.knative.dev/maxScale\""
        );
        assert_eq!(render_key("1st"), "\"1st\"");
    }
}
