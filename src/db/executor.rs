//! Statement execution
//!
//! Database errors come back as [`ExecutionOutcome::Failed`] so the shell can
//! print them and carry on; they are not guard concerns.

use crate::db::connection::DbPool;
use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, ValueRef};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Rows {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Statement ran and returned no rows.
    Empty,
    Failed(String),
}

/// Runs one admitted statement.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, statement: &str) -> ExecutionOutcome;
}

pub struct MySqlExecutor {
    pool: DbPool,
}

impl MySqlExecutor {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatementExecutor for MySqlExecutor {
    async fn execute(&self, statement: &str) -> ExecutionOutcome {
        debug!("Executing: {}", statement);
        // Text protocol: SHOW / DESCRIBE / EXPLAIN are not all preparable.
        match sqlx::raw_sql(statement).fetch_all(&self.pool).await {
            Ok(rows) => rows_to_outcome(&rows),
            Err(e) => ExecutionOutcome::Failed(e.to_string()),
        }
    }
}

fn rows_to_outcome(rows: &[MySqlRow]) -> ExecutionOutcome {
    let Some(first) = rows.first() else {
        return ExecutionOutcome::Empty;
    };

    let headers = first
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();

    let rows = rows
        .iter()
        .map(|row| (0..row.len()).map(|idx| cell_text(row, idx)).collect())
        .collect();

    ExecutionOutcome::Rows { headers, rows }
}

/// Render one cell as text; `NULL` for SQL nulls.
pub(crate) fn cell_text(row: &MySqlRow, idx: usize) -> String {
    match row.try_get_raw(idx) {
        Ok(value) if value.is_null() => return "NULL".to_string(),
        Ok(_) => {}
        Err(e) => return format!("<{}>", e),
    }

    // Text-protocol values are their textual form on the wire, so skipping
    // the type check is what makes numbers and dates decode as strings.
    if let Ok(text) = row.try_get_unchecked::<String, _>(idx) {
        return text;
    }
    row.try_get_unchecked::<Vec<u8>, _>(idx)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_else(|e| format!("<{}>", e))
}
