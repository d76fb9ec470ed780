//! 内置 schema 迁移

use super::Migration;

pub const CREATE_PRODUCTS: Migration = Migration {
    version: 20250219080000,
    name: "create_products",
    up: &[r#"
        CREATE TABLE products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        )
        "#,
        r#"
        CREATE TRIGGER products_touch_updated_at
        AFTER UPDATE OF name ON products
        FOR EACH ROW
        BEGIN
            UPDATE products SET updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') WHERE id = NEW.id;
        END
        "#,
    ],
    down: &["DROP TABLE products"],
};

pub const CREATE_USERS: Migration = Migration {
    version: 20250219080500,
    name: "create_users",
    up: &[r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        )
        "#,
        r#"
        CREATE TRIGGER users_touch_updated_at
        AFTER UPDATE OF name, email ON users
        FOR EACH ROW
        BEGIN
            UPDATE users SET updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') WHERE id = NEW.id;
        END
        "#,
    ],
    down: &["DROP TABLE users"],
};

/// reviews 依赖 products：product_id 非空且由外键约束
pub const CREATE_REVIEWS: Migration = Migration {
    version: 20250219081148,
    name: "create_reviews",
    up: &[
        r#"
        CREATE TABLE reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content TEXT,
            product_id INTEGER NOT NULL REFERENCES products(id),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        )
        "#,
        "CREATE INDEX index_reviews_on_product_id ON reviews (product_id)",
        r#"
        CREATE TRIGGER reviews_touch_updated_at
        AFTER UPDATE OF content, product_id ON reviews
        FOR EACH ROW
        BEGIN
            UPDATE reviews SET updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') WHERE id = NEW.id;
        END
        "#,
    ],
    // 触发器随表一起删除
    down: &[
        "DROP INDEX index_reviews_on_product_id",
        "DROP TABLE reviews",
    ],
};

pub fn builtin() -> Vec<Migration> {
    vec![CREATE_PRODUCTS, CREATE_USERS, CREATE_REVIEWS]
}
