// src/db.rs

//! Connection pool lifecycle: acquired once at startup, closed on shutdown.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;

const CONNECT_RETRIES: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Opens the pool, retrying while the database is still starting up.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > CONNECT_RETRIES {
                    tracing::error!("Failed to connect to database after {} retries", CONNECT_RETRIES);
                    return Err(e);
                }
                tracing::warn!(
                    "Database not ready, retrying in {}s... (Attempt {})",
                    RETRY_DELAY.as_secs(),
                    retry_count
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}

/// Applies the embedded migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations applied successfully.");
    Ok(())
}

/// Waits for checked-out connections to be returned, then closes the pool.
pub async fn close(pool: PgPool) {
    pool.close().await;
    tracing::info!("Database pool closed.");
}
