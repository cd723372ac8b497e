//! Regex-vs-literal classification of selector text

const REGEX_METACHARS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '[', ']', '(', ')', '{', '}', '|',
];

/// True when `text` contains a regex metacharacter not preceded by a backslash.
pub fn looks_like_regex(text: &str) -> bool {
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if REGEX_METACHARS.contains(&c) {
            return true;
        }
    }
    false
}

/// Drop escaping backslashes: `Log\.in` becomes `Log.in`.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Pattern body for a selector's text, without a case-insensitivity flag.
///
/// Regex-looking text is used as-is; anything else is escaped and wrapped so
/// a full-match engine behaves like "contains".
pub fn pattern_body(text: &str) -> String {
    if looks_like_regex(text) {
        text.to_string()
    } else {
        format!(".*{}.*", regex::escape(&unescape(text)))
    }
}

/// Case-insensitive pattern for a selector's text.
pub fn text_pattern(text: &str) -> String {
    format!("(?i){}", pattern_body(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescaped_metachar_is_regex() {
        assert!(looks_like_regex("Log.*n"));
        assert!(looks_like_regex("^Submit$"));
        assert!(looks_like_regex("(Yes|No)"));
    }

    #[test]
    fn test_escaped_metachar_is_literal() {
        assert!(!looks_like_regex("Log\\.in"));
        assert!(!looks_like_regex("Price \\$5"));
        assert!(!looks_like_regex("Plain text"));
    }

    #[test]
    fn test_literal_wrapped_for_contains() {
        assert_eq!(text_pattern("Login"), "(?i).*Login.*");
        assert_eq!(text_pattern("Log\\.in"), "(?i).*Log\\.in.*");
    }

    #[test]
    fn test_regex_kept_verbatim() {
        assert_eq!(text_pattern("Log.*n"), "(?i)Log.*n");
        let re = regex::Regex::new(&text_pattern("Log.*n")).unwrap();
        assert!(re.is_match("LOGIN"));
    }
}
