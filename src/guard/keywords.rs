//! Keyword vocabularies and leading-keyword extraction

/// Statements may only start with one of these.
pub const SAFE_KEYWORDS: &[&str] = &["SELECT", "SHOW", "DESCRIBE", "DESC", "EXPLAIN", "WITH"];

/// Forbidden anywhere in a statement. The scanner reports the first hit in
/// this order, so when several are present the earliest entry here is named.
pub const DESTRUCTIVE_KEYWORDS: &[&str] = &[
    // DML
    "DELETE", "INSERT", "UPDATE", "REPLACE", "MERGE", "UPSERT",
    // DDL
    "DROP", "CREATE", "ALTER", "TRUNCATE", "RENAME",
    // DCL
    "GRANT", "REVOKE",
    // Transaction control
    "COMMIT", "ROLLBACK", "SAVEPOINT",
    // Administrative
    "SET", "RESET", "SHUTDOWN", "KILL",
    // Database / file operations
    "USE", "LOAD", "IMPORT", "EXPORT",
    // Maintenance
    "REINDEX", "ANALYZE", "VACUUM", "OPTIMIZE",
    // Procedural execution
    "CALL", "EXECUTE", "EXEC", "PREPARE",
];

/// Leading run of ASCII letters, upper-cased.
///
/// `None` when the text is empty or starts with anything other than a letter.
/// Expects normalized input; leading whitespace is not skipped.
pub fn leading_keyword(statement: &str) -> Option<String> {
    let end = statement
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(statement.len());
    if end == 0 {
        return None;
    }
    Some(statement[..end].to_ascii_uppercase())
}

pub fn is_safe_leading(keyword: &str) -> bool {
    SAFE_KEYWORDS.iter().any(|safe| safe.eq_ignore_ascii_case(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_keyword_upper_cases() {
        assert_eq!(leading_keyword("select * from t").as_deref(), Some("SELECT"));
        assert_eq!(leading_keyword("Show tables").as_deref(), Some("SHOW"));
    }

    #[test]
    fn test_leading_keyword_stops_at_non_letter() {
        assert_eq!(leading_keyword("SELECT*FROM t").as_deref(), Some("SELECT"));
        assert_eq!(leading_keyword("WITH(x)").as_deref(), Some("WITH"));
        assert_eq!(leading_keyword("desc").as_deref(), Some("DESC"));
    }

    #[test]
    fn test_leading_keyword_absent() {
        assert_eq!(leading_keyword(""), None);
        assert_eq!(leading_keyword("(SELECT 1)"), None);
        assert_eq!(leading_keyword("1 + 1"), None);
        assert_eq!(leading_keyword(" SELECT"), None);
    }

    #[test]
    fn test_safe_leading() {
        assert!(is_safe_leading("SELECT"));
        assert!(is_safe_leading("desc"));
        assert!(!is_safe_leading("DROP"));
        assert!(!is_safe_leading("SELECTX"));
    }

    #[test]
    fn test_vocabularies_are_disjoint() {
        for safe in SAFE_KEYWORDS {
            assert!(!DESTRUCTIVE_KEYWORDS.contains(safe), "{} in both lists", safe);
        }
    }
}
