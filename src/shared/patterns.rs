//! Glob translation and exclusion-pattern combination.
//!
//! Hook configurations express file exclusions as a single regex, while
//! users write glob-style patterns. This module owns the one translation
//! used everywhere a glob becomes a regex, and the combinator that folds
//! several independent fragments into one anchored alternation.

/// Named capture group marker emitted by [`glob_to_regex`].
///
/// When multiple translated patterns are concatenated into a single
/// alternation, every occurrence must be renamed to a unique group name or
/// the combined expression is rejected as having duplicate group names.
const GROUP_MARKER: &str = "ps_d";

/// Combine independent exclusion-regex fragments into one anchored regex.
///
/// An empty input means no exclusion is needed and yields `None`. A single
/// pattern is returned unchanged. Multiple patterns have their capture
/// group markers renamed with a per-index suffix, then are joined with `|`
/// and wrapped in `^(...)$`.
pub fn combine_patterns(patterns: &[String]) -> Option<String> {
    if patterns.is_empty() {
        return None;
    }
    if patterns.len() == 1 {
        return Some(patterns[0].clone());
    }

    let renamed: Vec<String> = patterns
        .iter()
        .enumerate()
        .map(|(index, pattern)| pattern.replace(GROUP_MARKER, &format!("{GROUP_MARKER}{index}")))
        .collect();

    Some(format!("^({})$", renamed.join("|")))
}

/// Translate a gitignore-style glob into a regex fragment.
///
/// Follows gitwildmatch semantics: patterns without a `/` match at any
/// depth, patterns with one are relative to the repository root, and a
/// trailing `/` restricts the pattern to directories. Every fragment ends
/// with a `ps_d` capture group so that matching a directory also matches
/// everything beneath it.
pub fn glob_to_regex(pattern: &str) -> String {
    let trimmed = pattern.trim();
    let (body, dir_only) = match trimmed.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };
    let (body, rooted) = match body.strip_prefix('/') {
        Some(rest) => (rest, true),
        None => (body, false),
    };

    let mut regex = String::with_capacity(body.len() * 2);
    if !rooted && !body.contains('/') {
        regex.push_str("(?:[^/]+/)*");
    }

    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    if i + 2 < chars.len() && chars[i + 2] == '/' {
                        regex.push_str("(?:[^/]+/)*");
                        i += 3;
                    } else {
                        regex.push_str(".*");
                        i += 2;
                    }
                } else {
                    regex.push_str("[^/]*");
                    i += 1;
                }
            }
            '?' => {
                regex.push_str("[^/]");
                i += 1;
            }
            '[' => {
                // Character classes translate verbatim; an unterminated
                // class is escaped instead so the output stays valid.
                if let Some(end) = chars[i..].iter().position(|&c| c == ']') {
                    for &c in &chars[i..=i + end] {
                        regex.push(c);
                    }
                    i += end + 1;
                } else {
                    regex.push_str("\\[");
                    i += 1;
                }
            }
            c if "\\.+(){}^$|".contains(c) => {
                regex.push('\\');
                regex.push(c);
                i += 1;
            }
            c => {
                regex.push(c);
                i += 1;
            }
        }
    }

    if dir_only {
        regex.push_str("(?P<ps_d>/.*)");
    } else {
        regex.push_str("(?P<ps_d>/.*)?");
    }
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_of_nothing_is_none() {
        assert_eq!(combine_patterns(&[]), None);
    }

    #[test]
    fn combine_of_one_pattern_is_identity() {
        let pattern = glob_to_regex("*.py");
        let combined = combine_patterns(std::slice::from_ref(&pattern));
        assert_eq!(combined, Some(pattern));
    }

    #[test]
    fn combine_renames_capture_groups_and_anchors() {
        let patterns = vec![glob_to_regex("*.py"), glob_to_regex("*.txt")];
        let combined = combine_patterns(&patterns).unwrap();

        assert!(combined.starts_with("^("));
        assert!(combined.ends_with(")$"));
        assert!(combined.contains("ps_d0"));
        assert!(combined.contains("ps_d1"));
        // The combined result must compile as a single expression.
        regex::Regex::new(&combined).unwrap();
    }

    #[test]
    fn combine_is_deterministic() {
        let patterns = vec![glob_to_regex("*.py"), glob_to_regex("docs/")];
        assert_eq!(combine_patterns(&patterns), combine_patterns(&patterns));
    }

    #[test]
    fn glob_translation_matches_expected_paths() {
        let re = regex::Regex::new(&format!("^(?:{})$", glob_to_regex("*.py"))).unwrap();
        assert!(re.is_match("setup.py"));
        assert!(re.is_match("src/app/main.py"));
        assert!(!re.is_match("main.pyc"));
    }

    #[test]
    fn rooted_glob_only_matches_at_root() {
        let re = regex::Regex::new(&format!("^(?:{})$", glob_to_regex("/build/*.log"))).unwrap();
        assert!(re.is_match("build/errors.log"));
        assert!(!re.is_match("nested/build/errors.log"));
    }

    #[test]
    fn directory_glob_matches_contents() {
        let re = regex::Regex::new(&format!("^(?:{})$", glob_to_regex("target/"))).unwrap();
        assert!(re.is_match("target/debug/app"));
        assert!(!re.is_match("target"));
    }

    #[test]
    fn double_star_spans_directories() {
        let re = regex::Regex::new(&format!("^(?:{})$", glob_to_regex("src/**/*.rs"))).unwrap();
        assert!(re.is_match("src/lib.rs"));
        assert!(re.is_match("src/scan/pii.rs"));
    }
}
