pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod guard;
pub mod intent;
pub mod llm;
pub mod pipeline;
pub mod render;
pub mod repl;

pub use error::{Result, SnapError};
pub use extract::extract;
pub use guard::{normalize, validate, validate_batch, Rejection, StatementBatch, Verdict};
pub use intent::{classify, IntentClass};
pub use pipeline::{Admission, Pipeline};
