//! Intent Classifier
//!
//! Decides whether raw user input is already SQL or should go to the model.
//! This is deliberately narrower than the statement guard's allow-list and
//! says nothing about safety: `drop table x` is direct SQL here and gets
//! rejected by the guard afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentClass {
    DirectSql,
    NaturalLanguage,
}

impl fmt::Display for IntentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentClass::DirectSql => write!(f, "direct SQL"),
            IntentClass::NaturalLanguage => write!(f, "natural language"),
        }
    }
}

/// Words that turn `describe <word>` into a question rather than a table lookup.
const DESCRIBE_FILLERS: &[&str] = &["all", "the", "tables", "database", "databases", "me"];

/// `SHOW <word>` forms accepted as SQL.
const SHOW_TARGETS: &[&str] = &[
    "tables",
    "databases",
    "columns",
    "schemas",
    "engines",
    "status",
    "variables",
];

/// Any of these in a `show ...` input means it is phrased as a request.
const SHOW_FILLERS: &[&str] = &["me", "all", "list", "give", "tell", "what", "which", "find"];

const DIRECT_PREFIXES: &[&str] = &["select ", "insert ", "update ", "delete ", "create ", "drop "];

pub fn classify(input: &str) -> IntentClass {
    // Deliberately lenient: `show tables;` counts as direct SQL, so trailing
    // terminators are dropped before the words are matched.
    let text = input.trim().trim_end_matches(';').trim_end().to_lowercase();

    if text.starts_with("describe ") || text.starts_with("desc ") {
        let parts: Vec<&str> = text.split_whitespace().collect();
        return if parts.len() == 2 && !DESCRIBE_FILLERS.contains(&parts[1]) {
            IntentClass::DirectSql
        } else {
            IntentClass::NaturalLanguage
        };
    }

    if text.starts_with("show ") {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.iter().any(|word| SHOW_FILLERS.contains(word)) {
            return IntentClass::NaturalLanguage;
        }
        return if parts.len() >= 2 && SHOW_TARGETS.contains(&parts[1]) {
            IntentClass::DirectSql
        } else {
            IntentClass::NaturalLanguage
        };
    }

    if DIRECT_PREFIXES.iter().any(|prefix| text.starts_with(prefix)) {
        return IntentClass::DirectSql;
    }

    IntentClass::NaturalLanguage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(classify("describe orders"), IntentClass::DirectSql);
        assert_eq!(classify("DESC orders"), IntentClass::DirectSql);
        assert_eq!(classify("describe orders;"), IntentClass::DirectSql);
        assert_eq!(classify("describe all tables"), IntentClass::NaturalLanguage);
        assert_eq!(classify("describe tables"), IntentClass::NaturalLanguage);
        assert_eq!(classify("desc me"), IntentClass::NaturalLanguage);
        assert_eq!(classify("describe the orders table"), IntentClass::NaturalLanguage);
    }

    #[test]
    fn test_show() {
        assert_eq!(classify("show tables"), IntentClass::DirectSql);
        assert_eq!(classify("SHOW DATABASES;"), IntentClass::DirectSql);
        assert_eq!(classify("show columns from orders"), IntentClass::DirectSql);
        assert_eq!(classify("show status"), IntentClass::DirectSql);
        assert_eq!(classify("show me all tables"), IntentClass::NaturalLanguage);
        assert_eq!(classify("show orders"), IntentClass::NaturalLanguage);
        assert_eq!(classify("show tables which have orders"), IntentClass::NaturalLanguage);
    }

    #[test]
    fn test_sql_verbs_are_direct_regardless_of_safety() {
        assert_eq!(classify("select * from orders"), IntentClass::DirectSql);
        assert_eq!(classify("  SELECT 1"), IntentClass::DirectSql);
        assert_eq!(classify("drop table x"), IntentClass::DirectSql);
        assert_eq!(classify("delete from orders"), IntentClass::DirectSql);
        assert_eq!(classify("create table t (id int)"), IntentClass::DirectSql);
    }

    #[test]
    fn test_everything_else_is_natural_language() {
        assert_eq!(classify(""), IntentClass::NaturalLanguage);
        assert_eq!(classify("   "), IntentClass::NaturalLanguage);
        assert_eq!(classify("how many orders shipped last week?"), IntentClass::NaturalLanguage);
        assert_eq!(classify("selection of top customers"), IntentClass::NaturalLanguage);
        assert_eq!(classify("explain select 1"), IntentClass::NaturalLanguage);
        assert_eq!(classify("describe"), IntentClass::NaturalLanguage);
    }
}
