//! # API 统一错误处理
//!
//! 将下层看板域错误统一映射到 HTTP 状态码与 JSON 响应体。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kabuka_dashboard::error::DashboardError;
use kabuka_market::table::TableError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 资源未找到 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 请求参数错误 (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 下层业务错误 (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiErrorResponse::from_msg(message));
        (status, body).into_response()
    }
}

/// 从 `DashboardError` 转换
impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match &err {
            DashboardError::UnknownSegment(_) => ApiError::NotFound(err.to_string()),
            DashboardError::InvalidLookback { .. }
            | DashboardError::InvalidPriceRange(_)
            | DashboardError::UnknownEntity { .. }
            | DashboardError::Table(TableError::InvalidLookback(_)) => {
                ApiError::BadRequest(err.to_string())
            }
            DashboardError::Table(TableError::Cache(_)) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kabuka_core::cache::error::CacheError;

    fn status(err: DashboardError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_dashboard_error_status_mapping() {
        assert_eq!(
            status(DashboardError::UnknownSegment("funds".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(DashboardError::InvalidLookback { days: 0, min: 1, max: 365 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(DashboardError::UnknownEntity {
                segment: "us".into(),
                name: "nobody".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(DashboardError::Table(TableError::Cache(CacheError::Storage(
                "down".into()
            )))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
