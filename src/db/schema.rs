//! Database introspection for prompt building

use crate::db::connection::DbPool;
use crate::db::executor::cell_text;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One column of one table, as described to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub table: String,
    pub column: String,
    pub data_type: String,
}

pub async fn list_databases(pool: &DbPool) -> Result<Vec<String>> {
    first_column(pool, "SHOW DATABASES").await
}

pub async fn list_tables(pool: &DbPool) -> Result<Vec<String>> {
    first_column(pool, "SHOW TABLES").await
}

/// `DESCRIBE` one table: field name and declared type per column.
pub async fn table_schema(pool: &DbPool, table: &str) -> Result<Vec<SchemaColumn>> {
    let sql = format!("DESCRIBE {}", quote_identifier(table));
    let rows = sqlx::raw_sql(&sql).fetch_all(pool).await?;

    Ok(rows
        .iter()
        .map(|row| SchemaColumn {
            table: table.to_string(),
            column: cell_text(row, 0),
            data_type: cell_text(row, 1),
        })
        .collect())
}

/// Every column of every table in the current database.
pub async fn database_schema(pool: &DbPool) -> Result<Vec<SchemaColumn>> {
    let mut schema = Vec::new();
    for table in list_tables(pool).await? {
        schema.extend(table_schema(pool, &table).await?);
    }
    debug!("Loaded {} schema columns", schema.len());
    Ok(schema)
}

async fn first_column(pool: &DbPool, sql: &str) -> Result<Vec<String>> {
    let rows = sqlx::raw_sql(sql).fetch_all(pool).await?;
    Ok(rows.iter().map(|row| cell_text(row, 0)).collect())
}

/// Backtick-quote a MySQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
