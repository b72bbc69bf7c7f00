use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单个交易日的日线行情。
///
/// # Invariants
/// - `date` 为交易所当地日历日期。
/// - 同一序列中 `date` 唯一且递增。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    // 交易日
    pub date: NaiveDate,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量 (部分指数或基金可能缺失)
    pub volume: Option<f64>,
}
