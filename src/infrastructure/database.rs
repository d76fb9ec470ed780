//! 数据库基础设施

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Error,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::config::DatabaseConfig;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 外键、唯一或非空约束被数据库拒绝
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// 把约束类错误从普通数据库错误中区分出来
    pub fn classify(err: sqlx::Error) -> Self {
        if let Error::Database(db) = &err {
            if db.is_foreign_key_violation()
                || db.is_unique_violation()
                || db.is_check_violation()
                || db.message().contains("constraint failed")
            {
                return StoreError::ConstraintViolation(db.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// 连接池包装，外键约束始终开启
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // 内存库只存在于单个连接上，连接一旦回收数据就没了
        let pool = if is_memory_url(&config.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
                .connect_with(options)
                .await?
        };

        info!("Connected to database: {}", config.url);
        Ok(Self { pool })
    }

    /// 测试用的内存库
    pub async fn in_memory() -> Result<Self, Error> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn table_exists(&self, name: &str) -> Result<bool, Error> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_database_survives_across_queries() {
        let db = Database::in_memory().await.unwrap();
        sqlx::query("CREATE TABLE things (id INTEGER PRIMARY KEY)")
            .execute(db.get_pool())
            .await
            .unwrap();

        assert!(db.table_exists("things").await.unwrap());
        assert!(!db.table_exists("nothing").await.unwrap());
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.get_pool();
        sqlx::query("CREATE TABLE parents (id INTEGER PRIMARY KEY)")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE children (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parents(id))",
        )
        .execute(pool)
        .await
        .unwrap();

        let err = sqlx::query("INSERT INTO children (parent_id) VALUES (99)")
            .execute(pool)
            .await
            .unwrap_err();

        assert!(matches!(
            StoreError::classify(err),
            StoreError::ConstraintViolation(_)
        ));
    }

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:app?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://storefront.db"));
    }
}
