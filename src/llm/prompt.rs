use crate::db::SchemaColumn;

const RULES: &str = "\
- Generate a SINGLE SQL query (not multiple queries)
- Only generate SQL queries
- No DELETE, DROP, UPDATE, ALTER, CREATE, TRUNCATE statements
- Use only the tables and columns from the given schema
- If schema is available, use the exact table and column names
- Generate valid MySQL syntax
- For \"describe tables\" requests, use SELECT from information_schema or SHOW TABLES";

/// Render the translation prompt for one question.
pub fn build_prompt(question: &str, schema: &[SchemaColumn]) -> String {
    let schema_text = if schema.is_empty() {
        "No schema information available".to_string()
    } else {
        schema
            .iter()
            .map(|col| format!("{}.{} ({})", col.table, col.column, col.data_type))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an expert MYSQL assistant.\n\nSCHEMA:\n{}\n\nRULES:\n{}\n\nQUESTION:\n{}\n\nSQL:\n",
        schema_text, RULES, question
    )
}
