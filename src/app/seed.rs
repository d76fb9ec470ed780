//! 示例数据

use tracing::info;

use super::{
    products::repository::ProductRepository,
    reviews::{model::NewReview, repository::ReviewRepository},
    users::{model::NewUser, repository::UserRepository},
};
use crate::infrastructure::database::{Database, StoreError};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
    pub reviews: usize,
}

/// 已有用户时跳过
///
/// 检查与全部插入在同一个事务里，中途失败不会留下部分数据。
pub async fn seed(db: &Database) -> Result<SeedReport, StoreError> {
    let mut tx = db.get_pool().begin().await?;

    if UserRepository::count_in(&mut *tx).await? > 0 {
        info!("Database already contains data, skipping seed");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();
    for (name, email) in [
        ("David Heinemeier Hansson", "david@example.com"),
        ("Jason Fried", "jason@example.com"),
    ] {
        UserRepository::insert(
            &mut *tx,
            &NewUser {
                name: name.to_string(),
                email: email.to_string(),
            },
        )
        .await?;
        report.users += 1;
    }

    let product = ProductRepository::insert(&mut *tx, "Danish Design Chair").await?;
    report.products += 1;

    ReviewRepository::insert(
        &mut *tx,
        &NewReview {
            product_id: product.id,
            content: Some("Sturdy, and it looks the part.".to_string()),
        },
    )
    .await?;
    report.reviews += 1;

    tx.commit().await?;

    info!(?report, "Database seeded");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::migrations::Migrator;

    #[tokio::test]
    async fn seeds_once() {
        let db = Database::in_memory().await.unwrap();
        Migrator::builtin().run(db.get_pool()).await.unwrap();

        let first = seed(&db).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                users: 2,
                products: 1,
                reviews: 1
            }
        );

        assert_eq!(seed(&db).await.unwrap(), SeedReport::default());
        assert_eq!(
            ProductRepository::new(db.get_pool().clone())
                .count()
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn failed_seed_rolls_back_and_can_be_retried() {
        let db = Database::in_memory().await.unwrap();
        Migrator::builtin().run(db.get_pool()).await.unwrap();

        // products 插入失败时，之前插入的用户也不应保留
        sqlx::query(
            "CREATE TRIGGER block_products BEFORE INSERT ON products BEGIN SELECT RAISE(ABORT, 'products blocked'); END",
        )
        .execute(db.get_pool())
        .await
        .unwrap();

        assert!(seed(&db).await.is_err());
        let users = UserRepository::new(db.get_pool().clone());
        assert_eq!(users.count().await.unwrap(), 0);

        sqlx::query("DROP TRIGGER block_products")
            .execute(db.get_pool())
            .await
            .unwrap();

        let report = seed(&db).await.unwrap();
        assert_eq!(report.users, 2);
        assert_eq!(report.products, 1);
        assert_eq!(report.reviews, 1);
        assert_eq!(users.count().await.unwrap(), 2);
    }
}
