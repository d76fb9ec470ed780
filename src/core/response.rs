//! 核心响应处理模块

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use super::error::CoreError;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// API 响应结构
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub request_id: String,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// XML 响应，用法与 `axum::Json` 相同
///
/// 根元素名取自类型的 serde 名称。
#[derive(Debug, Clone, Copy, Default)]
pub struct Xml<T>(pub T);

impl<T: Serialize> Xml<T> {
    /// 渲染为带声明的完整文档
    pub fn render(&self) -> Result<String, CoreError> {
        let body = quick_xml::se::to_string(&self.0)
            .map_err(|e| CoreError::InternalServerError(format!("xml serialization: {e}")))?;
        Ok(format!("{XML_DECLARATION}\n{body}"))
    }
}

impl<T: Serialize> IntoResponse for Xml<T> {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(body) => (
                StatusCode::OK,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/xml; charset=utf-8"),
                )],
                body,
            )
                .into_response(),
            Err(err) => err.into_response(),
        }
    }
}
