//! 应用层：路由与各业务模块

pub mod health;
pub mod people;
pub mod products;
pub mod reviews;
pub mod seed;
pub mod users;

use axum::{middleware, routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::{config::HttpConfig, database::Database};
use users::{repository::UserRepository, service::UserService};

/// 共享状态，每个请求克隆一份；只持有连接池句柄
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub user_service: UserService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let user_service = UserService::new(UserRepository::new(db.get_pool().clone()));
        Self { db, user_service }
    }
}

/// 创建路由
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/people/:id", get(people::handler::show_person))
        .route("/users/:id", get(users::handler::get_user))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(http.timeout_seconds)))
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}
