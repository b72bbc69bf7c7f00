//! # DTO (Data Transfer Object) 层
//!
//! 查询参数与响应包装结构体。看板视图本身已经是可序列化的 DTO，
//! 直接复用 `kabuka-dashboard` 中的类型。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use kabuka_dashboard::view::TableView;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ============================================================
//  查询参数
// ============================================================

/// 价格表查询参数
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TableQuery {
    /// 回溯天数，缺省使用配置默认值
    pub days: Option<u32>,
}

/// 分区视图查询参数
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewQuery {
    /// 回溯天数，缺省使用配置默认值
    pub days: Option<u32>,
    /// 逗号分隔的显示名称；参数缺省表示默认选择，空串表示清空选择
    pub names: Option<String>,
    /// 价格轴下限
    pub price_min: Option<f64>,
    /// 价格轴上限
    pub price_max: Option<f64>,
}

impl ViewQuery {
    /// # Summary
    /// 解析 `names` 参数。
    ///
    /// # Logic
    /// - 缺省 => None (默认选择)
    /// - 空串 => Some([]) (用户清空了选择)
    /// - 否则按逗号切分，去掉首尾空白并丢弃空项
    pub fn selection(&self) -> Option<Vec<String>> {
        self.names.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
    }
}

// ============================================================
//  响应 DTO
// ============================================================

/// 分区价格表响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SegmentTableResponse {
    #[schema(example = "us")]
    pub segment_id: String,
    #[schema(example = 180)]
    pub lookback_days: u32,
    pub table: TableView,
}

/// 缓存失效结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvalidateResponse {
    /// 被移除的缓存条目数
    #[schema(example = 2)]
    pub removed: usize,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
