//! Extraction Stage
//!
//! Pulls one candidate SQL statement out of free-form model output. The
//! candidate is untrusted and still goes through the statement guard.

use crate::guard::keywords::{is_safe_leading, leading_keyword};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SQL_FENCE: Regex =
        Regex::new(r"(?is)```sql\s*(.*?)\s*```").expect("sql fence pattern");
}

/// First ```` ```sql ```` block if there is one, otherwise the whole reply
/// when it opens with a read-only keyword. `None` when neither applies.
///
/// Outside a fenced block nothing is searched for mid-text, so a chatty
/// preamble ("Sure! SELECT ...") yields `None`.
pub fn extract(model_output: &str) -> Option<String> {
    if let Some(captures) = SQL_FENCE.captures(model_output) {
        return captures.get(1).map(|body| body.as_str().trim().to_string());
    }

    let text = model_output.trim();
    let keyword = leading_keyword(text)?;
    if is_safe_leading(&keyword) {
        Some(text.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block() {
        assert_eq!(extract("```sql\nSELECT 1\n```").as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn test_fenced_block_with_prose_around_it() {
        let reply = "Here is the query you asked for:\n\n```SQL\nSELECT name\nFROM customers\nLIMIT 5;\n```\nLet me know!";
        assert_eq!(
            extract(reply).as_deref(),
            Some("SELECT name\nFROM customers\nLIMIT 5;")
        );
    }

    #[test]
    fn test_fence_on_same_line() {
        assert_eq!(extract("```sql SHOW TABLES ```").as_deref(), Some("SHOW TABLES"));
    }

    #[test]
    fn test_first_fence_wins() {
        let reply = "```sql\nSELECT 1\n```\nor\n```sql\nSELECT 2\n```";
        assert_eq!(extract(reply).as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn test_fenced_content_returned_even_if_destructive() {
        assert_eq!(
            extract("```sql\nDROP TABLE users;\n```").as_deref(),
            Some("DROP TABLE users;")
        );
    }

    #[test]
    fn test_bare_leading_keyword() {
        assert_eq!(
            extract("  select count(*) from orders  ").as_deref(),
            Some("select count(*) from orders")
        );
        assert_eq!(
            extract("WITH t AS (SELECT 1) SELECT * FROM t").as_deref(),
            Some("WITH t AS (SELECT 1) SELECT * FROM t")
        );
        assert_eq!(extract("DESC orders").as_deref(), Some("DESC orders"));
    }

    #[test]
    fn test_preamble_is_not_searched() {
        assert_eq!(extract("Sure! SELECT 1"), None);
    }

    #[test]
    fn test_nothing_extractable() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("   "), None);
        assert_eq!(extract("DELETE FROM orders"), None);
        assert_eq!(extract("```python\nprint(1)\n```"), None);
        assert_eq!(extract("selection is hard"), None);
    }
}
