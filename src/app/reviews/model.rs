//! Reviews 数据模型

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 商品评价，`product_id` 由数据库外键保证指向已存在的商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    /// 自由文本，可为空，不做校验
    pub content: Option<String>,
    pub product_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReview {
    pub product_id: i64,
    pub content: Option<String>,
}
