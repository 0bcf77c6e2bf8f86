//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! sb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SALES_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/web/migrations/` and are embedded into the
//! web crate at build time.

use thiserror::Error;

use super::ConnectError;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = super::connect().await?;

    tracing::info!("Running sales migrations...");
    salesbook_web::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Sales migrations complete!");
    Ok(())
}
