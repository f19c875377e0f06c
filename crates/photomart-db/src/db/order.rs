use async_trait::async_trait;
use photomart_core::models::{NewOrder, Order};
use photomart_core::AppError;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::traits::OrderRepositoryTrait;

const ORDER_COLUMNS: &str = "id, customer_id, customer_email, items, total_amount, currency, \
     payment_status, payment_gateway_id, download_links, created_at, updated_at";

/// Repository for orders
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepositoryTrait for PostgresOrderRepository {
    #[tracing::instrument(skip(self, order), fields(db.table = "orders", db.operation = "insert", items = order.items.len()))]
    async fn create_order(&self, order: NewOrder) -> Result<Order, AppError> {
        let created = sqlx::query_as::<Postgres, Order>(&format!(
            r#"
            INSERT INTO orders (customer_id, customer_email, items, total_amount, currency)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.customer_id)
        .bind(&order.customer_email)
        .bind(Json(&order.items))
        .bind(order.total_amount)
        .bind(&order.currency)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "orders", db.operation = "select", db.record_id = %id))]
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<Postgres, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    #[tracing::instrument(skip(self, email), fields(db.table = "orders", db.operation = "select"))]
    async fn list_by_customer_email(&self, email: &str) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<Postgres, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_email = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
