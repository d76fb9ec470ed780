//! Users 处理器

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};

use super::model::User;
use crate::app::AppState;
use crate::core::{
    error::CoreError,
    format::{negotiate, ResponseFormat},
    response::ApiResponse,
};

/// `GET /users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let id = negotiate(&segment, &headers, ResponseFormat::Json)?;

    // 非数字的 id 不可能匹配任何记录
    let id: i64 = id
        .parse()
        .map_err(|_| CoreError::NotFound(format!("user {} does not exist", id)))?;

    let user = state.user_service.get_user(id).await?;
    Ok(Json(ApiResponse::success(user)))
}
