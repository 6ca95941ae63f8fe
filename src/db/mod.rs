//! Database module for MySQL connectivity, introspection and execution
//!
//! Only statements already admitted by the guard reach [`executor`].

pub mod connection;
pub mod executor;
pub mod schema;

pub use connection::{connect_database, connect_server, DbPool};
pub use executor::{ExecutionOutcome, MySqlExecutor, StatementExecutor};
pub use schema::{database_schema, list_databases, list_tables, table_schema, SchemaColumn};
