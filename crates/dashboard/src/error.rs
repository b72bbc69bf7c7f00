use kabuka_market::table::TableError;
use thiserror::Error;

/// # Summary
/// 看板域错误枚举。
///
/// # Invariants
/// - 空选择不是错误，而是视图中的提示状态。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    // 分区不存在或已禁用
    #[error("Unknown segment: {0}")]
    UnknownSegment(String),
    // 回溯天数超出滑块范围
    #[error("Lookback {days} is outside {min}..={max} days")]
    InvalidLookback { days: u32, min: u32, max: u32 },
    // 价格区间非法
    #[error("Invalid price range: {0}")]
    InvalidPriceRange(String),
    // 选择了分区之外的名称
    #[error("Unknown entity {name:?} in segment {segment}")]
    UnknownEntity { segment: String, name: String },
    #[error(transparent)]
    Table(#[from] TableError),
}
