use anyhow::{anyhow, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use shared_config::AppConfig;

/// Thin handle over the Postgres pool. Cloning is cheap (the pool is
/// reference-counted), so services hold their own copy.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(anyhow!("DATABASE_URL is not configured"));
        }

        debug!("Connecting to Postgres");
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a unit of work. Every multi-step mutation runs its reads and
    /// writes inside one of these and either commits or rolls back whole.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}
