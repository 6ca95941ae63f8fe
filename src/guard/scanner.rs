//! Destructive-Pattern Scanner
//!
//! Position-independent checks over a normalized statement: destructive
//! keywords anywhere in the text, then a fixed list of injection idioms.

use crate::guard::keywords::DESTRUCTIVE_KEYWORDS;
use crate::guard::normalize::normalize;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// Composite deny patterns, checked in this order. The label is what gets
/// reported; the regex runs against upper-cased normalized text.
const INJECTION_PATTERNS: &[(&str, &str)] = &[
    (";DROP", r";\s*DROP\b"),
    (";DELETE", r";\s*DELETE\b"),
    (";TRUNCATE", r";\s*TRUNCATE\b"),
    (";ALTER", r";\s*ALTER\b"),
    (";UPDATE", r";\s*UPDATE\b"),
    (";INSERT", r";\s*INSERT\b"),
    (";CREATE", r";\s*CREATE\b"),
    ("UNION...DELETE|DROP|UPDATE|INSERT|ALTER", r"\bUNION\b.*?\b(DELETE|DROP|UPDATE|INSERT|ALTER)\b"),
    ("INTO OUTFILE", r"\bINTO\s+OUTFILE\b"),
    ("INTO DUMPFILE", r"\bINTO\s+DUMPFILE\b"),
    ("LOAD_FILE", r"\bLOAD_FILE\b"),
];

/// Checked against the raw statement: normalization would strip these as
/// ordinary comments, but MySQL executes the body of `/*! ... */`.
const RAW_PATTERNS: &[(&str, &str)] = &[("/*!", r"/\*!")];

lazy_static! {
    // Word boundaries treat letters, digits and `_` as identifier characters,
    // so `USED_BY` or `last_update` never match `USE` / `UPDATE`.
    static ref KEYWORD_PATTERNS: Vec<(&'static str, Regex)> = DESTRUCTIVE_KEYWORDS
        .iter()
        .map(|keyword| {
            let pattern = Regex::new(&format!(r"\b{}\b", keyword)).expect("keyword pattern");
            (*keyword, pattern)
        })
        .collect();

    static ref COMPILED_INJECTION_PATTERNS: Vec<(&'static str, Regex)> = INJECTION_PATTERNS
        .iter()
        .map(|(label, pattern)| (*label, Regex::new(pattern).expect("injection pattern")))
        .collect();

    static ref COMPILED_RAW_PATTERNS: Vec<(&'static str, Regex)> = RAW_PATTERNS
        .iter()
        .map(|(label, pattern)| (*label, Regex::new(pattern).expect("raw pattern")))
        .collect();
}

/// What made the scanner flag a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    Keyword(&'static str),
    Pattern(&'static str),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Keyword(keyword) => write!(f, "{}", keyword),
            Finding::Pattern(pattern) => write!(f, "{}", pattern),
        }
    }
}

/// Scan a statement. `None` means nothing destructive was found.
///
/// Keywords are checked first, in vocabulary order, then the injection
/// patterns. Input is normalized again, which is a no-op on already
/// normalized text.
pub fn scan(statement: &str) -> Option<Finding> {
    let upper = normalize(statement).to_uppercase();

    for (keyword, pattern) in KEYWORD_PATTERNS.iter() {
        if pattern.is_match(&upper) {
            return Some(Finding::Keyword(keyword));
        }
    }

    for (label, pattern) in COMPILED_INJECTION_PATTERNS.iter() {
        if pattern.is_match(&upper) {
            return Some(Finding::Pattern(label));
        }
    }

    None
}

/// Scan the statement exactly as it will be sent, before any comment
/// stripping. Catches comment forms the server executes.
pub fn scan_raw(statement: &str) -> Option<Finding> {
    COMPILED_RAW_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(statement))
        .map(|(label, _)| Finding::Pattern(*label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_select_passes() {
        assert_eq!(scan("SELECT id, name FROM users WHERE id = 1"), None);
        assert_eq!(scan("SHOW TABLES"), None);
    }

    #[test]
    fn test_embedded_keyword_flagged() {
        assert_eq!(
            scan("SELECT * FROM (DELETE FROM t RETURNING *) x"),
            Some(Finding::Keyword("DELETE"))
        );
        assert_eq!(scan("select 1; drop table t"), Some(Finding::Keyword("DROP")));
    }

    #[test]
    fn test_identifier_substrings_do_not_match() {
        assert_eq!(scan("SELECT used_by, last_update, created_at FROM t"), None);
        assert_eq!(scan("SELECT settings, user_reset_count FROM accounts"), None);
        assert_eq!(scan("SELECT loader FROM jobs"), None);
    }

    #[test]
    fn test_reports_in_vocabulary_order() {
        // DROP precedes DELETE in the text but DELETE comes first in the vocabulary.
        assert_eq!(
            scan("SELECT 1; DROP TABLE a; DELETE FROM b"),
            Some(Finding::Keyword("DELETE"))
        );
    }

    #[test]
    fn test_keyword_hidden_in_comment_is_ignored() {
        assert_eq!(scan("SELECT 1 /* DROP TABLE t */"), None);
        assert_eq!(scan("SELECT 1 -- DELETE everything"), None);
    }

    #[test]
    fn test_file_exfiltration_patterns() {
        assert_eq!(
            scan("SELECT * FROM users INTO OUTFILE '/tmp/u.csv'"),
            Some(Finding::Pattern("INTO OUTFILE"))
        );
        assert_eq!(
            scan("SELECT secret FROM t INTO   DUMPFILE '/tmp/x'"),
            Some(Finding::Pattern("INTO DUMPFILE"))
        );
        assert_eq!(
            scan("SELECT LOAD_FILE('/etc/passwd')"),
            Some(Finding::Pattern("LOAD_FILE"))
        );
    }

    #[test]
    fn test_executable_comment_seen_only_raw() {
        let sql = "SELECT 1 /*!50000 UNION SELECT LOAD_FILE('/etc/passwd') */";
        assert_eq!(scan(sql), None);
        assert_eq!(scan_raw(sql), Some(Finding::Pattern("/*!")));
        assert_eq!(scan_raw("SELECT 1 /* plain */"), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(scan("select * from t into outfile 'x'"), Some(Finding::Pattern("INTO OUTFILE")));
        assert_eq!(scan("SELECT 1 FROM t WHERE Grant = 1"), Some(Finding::Keyword("GRANT")));
    }
}
