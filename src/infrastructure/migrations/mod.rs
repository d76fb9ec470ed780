//! 版本化迁移
//!
//! 每个迁移是一条纯数据记录（版本号、名称、up/down 语句），由 [`Migrator`] 负责执行，
//! 已应用的版本记在 `schema_migrations` 表里。单个迁移与它的记录行在同一个事务中提交。

pub mod schema;

pub use schema::builtin;

use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

const CREATE_SCHEMA_MIGRATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
)
"#;

/// 一个迁移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// 时间戳形式的版本号，例如 `20250219081148`
    pub version: i64,
    pub name: &'static str,
    pub up: &'static [&'static str],
    /// 按反向依赖顺序撤销 `up` 创建的对象
    pub down: &'static [&'static str],
}

/// 迁移状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: i64,
    pub name: &'static str,
    pub applied_at: Option<NaiveDateTime>,
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("duplicate migration version {0}")]
    DuplicateVersion(i64),
    #[error("unknown migration version {0}")]
    UnknownVersion(i64),
    #[error("migration {0} is already applied")]
    AlreadyApplied(i64),
    #[error("migration {version} conflicts with existing schema: {message}")]
    AlreadyExists { version: i64, message: String },
    #[error("migration {version} failed: {source}")]
    Statement {
        version: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl MigrationError {
    fn from_statement(version: i64, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.message().contains("already exists") {
                return MigrationError::AlreadyExists {
                    version,
                    message: db.message().to_string(),
                };
            }
        }
        MigrationError::Statement {
            version,
            source: err,
        }
    }
}

/// 迁移执行器
#[derive(Debug, Clone)]
pub struct Migrator {
    migrations: Vec<Migration>,
}

impl Migrator {
    /// 按版本号排序，拒绝重复版本
    pub fn new(mut migrations: Vec<Migration>) -> Result<Self, MigrationError> {
        let mut seen = HashSet::new();
        for m in &migrations {
            if !seen.insert(m.version) {
                return Err(MigrationError::DuplicateVersion(m.version));
            }
        }
        migrations.sort_by_key(|m| m.version);
        Ok(Self { migrations })
    }

    /// 内置迁移集合
    pub fn builtin() -> Self {
        Self {
            migrations: builtin(),
        }
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// 执行全部未应用的迁移，返回本次应用的版本
    pub async fn run(&self, pool: &SqlitePool) -> Result<Vec<i64>, MigrationError> {
        let applied = self.applied(pool).await?;
        let mut newly_applied = Vec::new();

        for migration in &self.migrations {
            if applied.contains_key(&migration.version) {
                debug!(version = migration.version, "migration already applied, skipping");
                continue;
            }
            self.apply_one(pool, migration).await?;
            newly_applied.push(migration.version);
        }

        if newly_applied.is_empty() {
            info!("Schema is up to date");
        }
        Ok(newly_applied)
    }

    /// 只执行指定版本
    pub async fn apply(&self, pool: &SqlitePool, version: i64) -> Result<(), MigrationError> {
        let migration = self.find(version)?;
        if self.applied(pool).await?.contains_key(&version) {
            return Err(MigrationError::AlreadyApplied(version));
        }
        self.apply_one(pool, migration).await
    }

    /// 从最新的开始撤销 `steps` 个已应用迁移，返回撤销的版本
    pub async fn rollback(
        &self,
        pool: &SqlitePool,
        steps: usize,
    ) -> Result<Vec<i64>, MigrationError> {
        let applied = self.applied(pool).await?;
        let mut reverted = Vec::new();

        for version in applied.keys().rev().take(steps) {
            let migration = self.find(*version)?;
            let mut tx = pool.begin().await?;
            for statement in migration.down {
                sqlx::query(statement)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| MigrationError::from_statement(migration.version, e))?;
            }
            sqlx::query("DELETE FROM schema_migrations WHERE version = ?")
                .bind(migration.version)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            info!(
                version = migration.version,
                name = migration.name,
                "Reverted migration"
            );
            reverted.push(migration.version);
        }

        Ok(reverted)
    }

    pub async fn status(&self, pool: &SqlitePool) -> Result<Vec<MigrationStatus>, MigrationError> {
        let applied = self.applied(pool).await?;
        Ok(self
            .migrations
            .iter()
            .map(|m| MigrationStatus {
                version: m.version,
                name: m.name,
                applied_at: applied.get(&m.version).copied(),
            })
            .collect())
    }

    async fn applied(
        &self,
        pool: &SqlitePool,
    ) -> Result<BTreeMap<i64, NaiveDateTime>, MigrationError> {
        sqlx::query(CREATE_SCHEMA_MIGRATIONS).execute(pool).await?;

        let rows: Vec<(i64, NaiveDateTime)> =
            sqlx::query_as("SELECT version, applied_at FROM schema_migrations ORDER BY version")
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().collect())
    }

    fn find(&self, version: i64) -> Result<&Migration, MigrationError> {
        self.migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or(MigrationError::UnknownVersion(version))
    }

    async fn apply_one(
        &self,
        pool: &SqlitePool,
        migration: &Migration,
    ) -> Result<(), MigrationError> {
        let mut tx = pool.begin().await?;
        for statement in migration.up {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| MigrationError::from_statement(migration.version, e))?;
        }
        sqlx::query("INSERT INTO schema_migrations (version, name) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(
            version = migration.version,
            name = migration.name,
            "Applied migration"
        );
        Ok(())
    }
}
