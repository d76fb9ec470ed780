//! # storefront
//!
//! 一个小型 Web 后端：
//! - `GET /people/:id` 以 XML 返回固定的人物信息
//! - `GET /users/:id` 以 JSON 返回数据库中的用户，不存在时 404
//! - 版本化迁移，建立 products / users / reviews 表，reviews 通过外键引用 products
//!
//! 分层与模块划分：`app` 处理请求，`core` 提供错误、响应与中间件，
//! `infrastructure` 提供配置、日志、数据库与迁移。

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppState};
pub use crate::core::error::CoreError;
