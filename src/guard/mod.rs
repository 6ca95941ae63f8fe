//! Statement Guard
//!
//! Read-only admission policy for SQL text. Keyword based, not a parser:
//! comments are stripped, the leading keyword is allow-listed, and the rest
//! of the statement is scanned for destructive verbs and injection idioms.

pub mod keywords;
pub mod normalize;
pub mod scanner;
pub mod validator;

pub use keywords::{is_safe_leading, leading_keyword, DESTRUCTIVE_KEYWORDS, SAFE_KEYWORDS};
pub use normalize::normalize;
pub use scanner::{scan, scan_raw, Finding};
pub use validator::{admit_batch, validate, validate_batch, Rejection, StatementBatch, Verdict};
