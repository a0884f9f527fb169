//! Row-level persistence.
//!
//! Every query that touches projects or tasks carries the caller's user id and
//! filters on project ownership, so rows owned by someone else behave exactly like
//! rows that do not exist. Functions are generic over `PgExecutor` and run either
//! directly against the pool or inside a request's transaction.

pub mod projects;
pub mod tasks;
pub mod users;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Opens the connection pool described by `config`.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
}

/// Applies the embedded schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
