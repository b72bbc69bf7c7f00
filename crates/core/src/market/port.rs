use crate::market::entity::DailyBar;
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 行情数据提供者接口（外部数据源）。
///
/// # Invariants
/// - 每次调用都是一次独立的外部请求，实现者不做缓存。
/// - 返回的日线按日期升序排列。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取某个证券最近 `period_days` 个自然日的日线数据。
    ///
    /// # Logic
    /// 1. 以证券代码构建数据源请求。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 丢弃收盘价缺失的记录。
    ///
    /// # Arguments
    /// * `symbol`: 提供者侧证券代码。
    /// * `period_days`: 回溯的自然日天数。
    ///
    /// # Returns
    /// 成功返回日线列表；代码无数据时返回 `MarketError::NotFound`。
    async fn fetch_history(
        &self,
        symbol: &str,
        period_days: u32,
    ) -> Result<Vec<DailyBar>, MarketError>;
}
