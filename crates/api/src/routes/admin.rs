//! # 管理路由控制器
//!
//! 运维用接口，目前只有价格表缓存失效。

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ApiResponse, InvalidateResponse};

/// 清空价格表缓存
///
/// 下一次请求将重新从行情源抓取。
#[utoipa::path(
    post,
    path = "/api/v1/admin/cache/invalidate",
    tag = "管理 (Admin)",
    responses(
        (status = 200, description = "缓存已清空", body = ApiResponse<InvalidateResponse>),
        (status = 500, description = "服务器内部错误", body = ApiErrorResponse)
    )
)]
pub async fn invalidate_cache(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InvalidateResponse>>, ApiError> {
    let removed = state.dashboard.invalidate().await?;
    tracing::info!("admin invalidated price table cache ({} entries)", removed);
    Ok(Json(ApiResponse::ok(InvalidateResponse { removed })))
}
