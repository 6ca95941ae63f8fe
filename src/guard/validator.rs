//! Statement Validator
//!
//! Combines the leading-keyword allow-list with the destructive scan. The
//! batch form splits on `;` and rejects the whole batch on the first unsafe
//! statement, so nothing runs unless every statement passed.

use crate::guard::keywords::{is_safe_leading, leading_keyword};
use crate::guard::normalize::normalize;
use crate::guard::scanner::{scan, scan_raw, Finding};
use thiserror::Error;

/// Why a statement or batch was refused. `Display` is the user-facing reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("empty query")]
    EmptyQuery,

    #[error("unparseable")]
    Unparseable,

    #[error("forbidden leading keyword: {0}")]
    ForbiddenLeadingKeyword(String),

    #[error("forbidden keyword: {0}")]
    ForbiddenKeyword(&'static str),

    #[error("malicious pattern: {0}")]
    MaliciousPattern(&'static str),

    #[error("no statements")]
    NoStatements,

    /// `index` is 1-based.
    #[error("statement {index}: {reason}")]
    Statement { index: usize, reason: Box<Rejection> },
}

impl From<Finding> for Rejection {
    fn from(finding: Finding) -> Self {
        match finding {
            Finding::Keyword(keyword) => Rejection::ForbiddenKeyword(keyword),
            Finding::Pattern(pattern) => Rejection::MaliciousPattern(pattern),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe(Rejection),
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Safe)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Safe => None,
            Verdict::Unsafe(rejection) => Some(rejection),
        }
    }
}

impl<T> From<Result<T, Rejection>> for Verdict {
    fn from(result: Result<T, Rejection>) -> Self {
        match result {
            Ok(_) => Verdict::Safe,
            Err(rejection) => Verdict::Unsafe(rejection),
        }
    }
}

/// Statements that all passed validation, in execution order. Each one is
/// the trimmed text as written; only the checks see the normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBatch {
    statements: Vec<String>,
}

impl StatementBatch {
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().map(String::as_str)
    }
}

/// Validate a single statement.
pub fn validate(sql: &str) -> Verdict {
    check_statement(sql).into()
}

/// Validate a `;`-separated batch. Safe only if every statement is safe.
pub fn validate_batch(sql: &str) -> Verdict {
    admit_batch(sql).into()
}

/// Batch validation that hands back the statements to run on success.
///
/// Fragments that are blank after trimming are dropped before numbering. A
/// fragment holding only a comment is kept and fails as `unparseable`.
pub fn admit_batch(sql: &str) -> Result<StatementBatch, Rejection> {
    let fragments: Vec<&str> = sql
        .split(';')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect();

    if fragments.is_empty() {
        return Err(Rejection::NoStatements);
    }

    let mut statements = Vec::with_capacity(fragments.len());
    for (idx, fragment) in fragments.iter().enumerate() {
        check_statement(fragment).map_err(|reason| Rejection::Statement {
            index: idx + 1,
            reason: Box::new(reason),
        })?;
        statements.push(fragment.to_string());
    }

    Ok(StatementBatch { statements })
}

fn check_statement(sql: &str) -> Result<(), Rejection> {
    if sql.trim().is_empty() {
        return Err(Rejection::EmptyQuery);
    }

    let normalized = normalize(sql);
    let keyword = leading_keyword(&normalized).ok_or(Rejection::Unparseable)?;

    if !is_safe_leading(&keyword) {
        return Err(Rejection::ForbiddenLeadingKeyword(keyword));
    }

    if let Some(finding) = scan(&normalized).or_else(|| scan_raw(sql)) {
        return Err(finding.into());
    }

    Ok(())
}
