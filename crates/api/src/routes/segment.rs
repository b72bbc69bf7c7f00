use axum::Json;
use axum::extract::{Path, Query, State};
use kabuka_dashboard::selection::SegmentState;
use kabuka_dashboard::view::{SegmentView, TableView};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ApiResponse, SegmentTableResponse, TableQuery, ViewQuery};

/// 获取分区完整价格表
///
/// 行为全部成功取得数据的证券，列为全部交易日的并集，缺失值为 null。
#[utoipa::path(
    get,
    path = "/api/v1/segments/{id}/table",
    tag = "分区 (Segment)",
    params(
        ("id" = String, Path, description = "分区 ID"),
        TableQuery
    ),
    responses(
        (status = 200, description = "价格表", body = ApiResponse<SegmentTableResponse>),
        (status = 400, description = "回溯天数非法", body = ApiErrorResponse),
        (status = 404, description = "分区不存在", body = ApiErrorResponse)
    )
)]
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TableQuery>,
) -> Result<Json<ApiResponse<SegmentTableResponse>>, ApiError> {
    let caption = format!("Stock prices ({})", state.dashboard.segment(&id)?.unit);
    let days = state.dashboard.resolve_lookback(query.days)?;
    let table = state.dashboard.price_table(&id, Some(days)).await?;

    Ok(Json(ApiResponse::ok(SegmentTableResponse {
        segment_id: id,
        lookback_days: days,
        table: TableView::new(caption, &table, state.dashboard.date_label_format()),
    })))
}

/// 渲染单个分区
///
/// `names` 缺省时使用默认选择；`names=` (空串) 表示清空选择，返回提示而不是图表。
#[utoipa::path(
    get,
    path = "/api/v1/segments/{id}/view",
    tag = "分区 (Segment)",
    params(
        ("id" = String, Path, description = "分区 ID"),
        ViewQuery
    ),
    responses(
        (status = 200, description = "分区视图", body = ApiResponse<SegmentView>),
        (status = 400, description = "参数非法", body = ApiErrorResponse),
        (status = 404, description = "分区不存在", body = ApiErrorResponse)
    )
)]
pub async fn get_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ApiResponse<SegmentView>>, ApiError> {
    let segment_state = SegmentState {
        selection: query.selection(),
        price_min: query.price_min,
        price_max: query.price_max,
        id,
    };
    let view = state
        .dashboard
        .render_segment(query.days, &segment_state)
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}
