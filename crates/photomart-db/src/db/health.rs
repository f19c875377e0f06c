use async_trait::async_trait;
use photomart_core::AppError;
use sqlx::PgPool;

use crate::traits::DatabaseProbe;

#[derive(Clone)]
pub struct PostgresHealth {
    pool: PgPool,
}

impl PostgresHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseProbe for PostgresHealth {
    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
