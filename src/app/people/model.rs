//! People 数据模型

use serde::{Deserialize, Serialize};

/// 每次请求临时构造的人物，不落库
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "person")]
pub struct Person {
    pub name: String,
    pub bio: String,
}

impl Person {
    pub fn featured() -> Self {
        Self {
            name: "David Heinemeier Hansson".to_string(),
            bio: "A product of Danish Design during the Winter of '79...".to_string(),
        }
    }
}
