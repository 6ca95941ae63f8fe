//! Database connection management using sqlx

use crate::config::DbProfile;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::info;

pub type DbPool = MySqlPool;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect without selecting a database, for `SHOW DATABASES`.
pub async fn connect_server(profile: &DbProfile) -> Result<DbPool, sqlx::Error> {
    connect(profile, None).await
}

/// Connect with `database` as the default schema.
pub async fn connect_database(profile: &DbProfile, database: &str) -> Result<DbPool, sqlx::Error> {
    connect(profile, Some(database)).await
}

async fn connect(profile: &DbProfile, database: Option<&str>) -> Result<DbPool, sqlx::Error> {
    let mut options = MySqlConnectOptions::new()
        .host(&profile.host)
        .port(profile.port)
        .username(&profile.user);

    if let Some(password) = profile.resolved_password() {
        options = options.password(&password);
    }
    if let Some(database) = database {
        options = options.database(database);
    }

    let pool = MySqlPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect_with(options)
        .await?;

    info!(
        "Connected to {}@{}:{}{}",
        profile.user,
        profile.host,
        profile.port,
        database.map(|db| format!("/{}", db)).unwrap_or_default()
    );

    Ok(pool)
}
