//! Query Admission Pipeline
//!
//! raw input → intent → (direct SQL | model → extraction) → batch guard.
//! Execution is the caller's job and only ever receives an admitted batch.

use crate::db::SchemaColumn;
use crate::extract::extract;
use crate::guard::{admit_batch, Rejection, StatementBatch};
use crate::intent::{classify, IntentClass};
use crate::llm::{build_prompt, LlmFailure, SqlGenerator};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Every statement passed; `batch` holds them as written, in order.
    Admitted {
        intent: IntentClass,
        sql: String,
        batch: StatementBatch,
    },
    Blocked {
        intent: IntentClass,
        sql: String,
        rejection: Rejection,
    },
    /// Nothing to validate. `model_output` is the reply that had no SQL in
    /// it; `failure` is set when the model gave no reply at all.
    NoCandidate {
        model_output: Option<String>,
        failure: Option<LlmFailure>,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

pub struct Pipeline {
    generator: Arc<dyn SqlGenerator>,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn SqlGenerator>) -> Self {
        Self { generator }
    }

    pub async fn admit(&self, input: &str, schema: &[SchemaColumn]) -> Admission {
        let intent = classify(input);
        debug!("Classified {:?} as {}", input, intent);

        if input.trim().is_empty() {
            return Admission::Blocked {
                intent,
                sql: String::new(),
                rejection: Rejection::EmptyQuery,
            };
        }

        let sql = match intent {
            IntentClass::DirectSql => input.trim().to_string(),
            IntentClass::NaturalLanguage => {
                let prompt = build_prompt(input.trim(), schema);
                let output = match self.generator.generate(&prompt).await {
                    Ok(output) => output,
                    Err(failure) => {
                        return Admission::NoCandidate {
                            model_output: None,
                            failure: Some(failure),
                        }
                    }
                };
                match extract(&output) {
                    Some(sql) => sql,
                    None => {
                        warn!("Could not extract SQL from model output");
                        return Admission::NoCandidate {
                            model_output: Some(output),
                            failure: None,
                        };
                    }
                }
            }
        };

        match admit_batch(&sql) {
            Ok(batch) => {
                info!("Admitted {} statement(s)", batch.len());
                Admission::Admitted { intent, sql, batch }
            }
            Err(rejection) => {
                warn!("Blocked SQL ({}): {}", rejection, sql);
                Admission::Blocked {
                    intent,
                    sql,
                    rejection,
                }
            }
        }
    }
}
