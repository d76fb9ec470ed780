//! Products 持久化

use sqlx::{SqliteExecutor, SqlitePool};

use super::model::Product;
use crate::infrastructure::database::StoreError;

#[derive(Clone, Debug)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str) -> Result<Product, StoreError> {
        Self::insert(&self.pool, name).await
    }

    /// 在给定的连接或事务上插入
    pub async fn insert<'e, E>(executor: E, name: &str) -> Result<Product, StoreError>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (name) VALUES (?) RETURNING id, name, created_at, updated_at",
        )
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(StoreError::classify)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, created_at, updated_at FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
