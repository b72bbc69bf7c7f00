//! # 看板路由控制器
//!
//! 提供看板目录与整体渲染接口。前端每次交互后提交完整的 `DashboardState`，
//! 服务端不保存任何会话状态。

use axum::Json;
use axum::extract::State;
use kabuka_dashboard::selection::DashboardState;
use kabuka_dashboard::service::{DashboardCatalogue, DashboardView};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ApiResponse};

/// 获取看板目录
///
/// 返回回溯天数滑块范围、全部启用分区及其代码、默认选择与价格滑块边界。
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "看板 (Dashboard)",
    responses(
        (status = 200, description = "看板目录", body = ApiResponse<DashboardCatalogue>)
    )
)]
pub async fn get_catalogue(State(state): State<AppState>) -> Json<ApiResponse<DashboardCatalogue>> {
    Json(ApiResponse::ok(state.dashboard.catalogue()))
}

/// 渲染整个看板
///
/// 未在请求体中出现的分区使用默认状态；某个分区的空选择只影响该分区。
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/render",
    tag = "看板 (Dashboard)",
    request_body = DashboardState,
    responses(
        (status = 200, description = "渲染成功", body = ApiResponse<DashboardView>),
        (status = 400, description = "参数非法", body = ApiErrorResponse),
        (status = 404, description = "分区不存在", body = ApiErrorResponse)
    )
)]
pub async fn render_dashboard(
    State(state): State<AppState>,
    Json(req): Json<DashboardState>,
) -> Result<Json<ApiResponse<DashboardView>>, ApiError> {
    tracing::debug!("render dashboard: {:?}", req);
    let view = state.dashboard.render(&req).await?;
    Ok(Json(ApiResponse::ok(view)))
}
