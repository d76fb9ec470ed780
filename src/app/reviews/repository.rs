//! Reviews 持久化
//!
//! 插入时不预先检查商品是否存在，外键约束交给数据库；违反约束返回
//! [`StoreError::ConstraintViolation`]。

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use super::model::{NewReview, Review};
use crate::infrastructure::database::StoreError;

const COLUMNS: &str = "id, content, product_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, review: &NewReview) -> Result<Review, StoreError> {
        Self::insert(&self.pool, review).await
    }

    /// 在给定的连接或事务上插入
    pub async fn insert<'e, E>(executor: E, review: &NewReview) -> Result<Review, StoreError>
    where
        E: SqliteExecutor<'e>,
    {
        let created = sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (product_id, content) VALUES (?, ?) RETURNING {COLUMNS}"
        ))
        .bind(review.product_id)
        .bind(review.content.as_deref())
        .fetch_one(executor)
        .await
        .map_err(StoreError::classify)?;

        debug!(review_id = created.id, product_id = created.product_id, "review created");
        Ok(created)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Review>, StoreError> {
        let review =
            sqlx::query_as::<_, Review>(&format!("SELECT {COLUMNS} FROM reviews WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(review)
    }

    /// 更新内容；`updated_at` 由触发器刷新，所以更新后重新读取
    pub async fn update_content(
        &self,
        id: i64,
        content: Option<&str>,
    ) -> Result<Option<Review>, StoreError> {
        let result = sqlx::query("UPDATE reviews SET content = ? WHERE id = ?")
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::classify)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find(id).await
    }

    pub async fn for_product(&self, product_id: i64) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE product_id = ? ORDER BY id"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }
}
