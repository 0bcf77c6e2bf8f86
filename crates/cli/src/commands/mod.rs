pub mod account;
pub mod migrate;

use salesbook_web::config::{ConfigError, SalesConfig};
use sqlx::PgPool;

/// Load configuration and open a pool against `SALES_DATABASE_URL`.
async fn connect() -> Result<PgPool, ConnectError> {
    let config = SalesConfig::from_env()?;

    tracing::info!("Connecting to sales database...");
    Ok(salesbook_web::db::create_pool(&config.database_url).await?)
}

/// Errors raised while connecting.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}
