//! 健康检查

use axum::{extract::State, response::Json};

use super::AppState;
use crate::core::error::CoreError;

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, CoreError> {
    state.db.ping().await.map_err(CoreError::Database)?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "database": "connected",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
