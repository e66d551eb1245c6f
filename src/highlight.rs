use regex::{Regex, RegexBuilder};

/// Builds a case-insensitive regex matching the literal search text, for
/// highlighting matches in the list and detail panes. Empty input means
/// no highlighting.
pub fn build_highlight_regex(query: &str) -> Option<Regex> {
    let needle = query.trim();
    if needle.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        let regex = build_highlight_regex("proto").expect("regex");
        let matches: Vec<_> = regex.find_iter("Prototype PROTO").map(|m| m.as_str()).collect();
        assert_eq!(matches, vec!["Proto", "PROTO"]);
    }

    #[test]
    fn escapes_regex_metacharacters() {
        let regex = build_highlight_regex("a+b").expect("regex");
        assert!(regex.is_match("a+b"));
        assert!(!regex.is_match("aab"));
    }

    #[test]
    fn blank_input_builds_nothing() {
        assert!(build_highlight_regex("").is_none());
        assert!(build_highlight_regex("   ").is_none());
    }
}
