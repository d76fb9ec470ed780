//! Users 持久化

use sqlx::{SqliteExecutor, SqlitePool};

use super::model::{NewUser, User};
use crate::infrastructure::database::StoreError;

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 按主键精确查找，不存在时返回 `None`
    pub async fn find(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        Self::insert(&self.pool, user).await
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        Self::count_in(&self.pool).await
    }

    /// 在给定的连接或事务上插入
    pub async fn insert<'e, E>(executor: E, user: &NewUser) -> Result<User, StoreError>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES (?, ?) RETURNING id, name, email, created_at, updated_at",
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(executor)
        .await
        .map_err(StoreError::classify)
    }

    pub async fn count_in<'e, E>(executor: E) -> Result<i64, StoreError>
    where
        E: SqliteExecutor<'e>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
