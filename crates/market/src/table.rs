use kabuka_core::cache::error::CacheError;
use kabuka_core::cache::port::{Cache, CacheExt};
use kabuka_core::common::TickerSet;
use kabuka_core::market::error::MarketError;
use kabuka_core::market::port::MarketDataProvider;
use kabuka_core::table::PriceTable;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 价格表缓存键前缀
const KEY_PREFIX: &str = "price_table";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("lookback must be a positive number of days, got {0}")]
    InvalidLookback(u32),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// # Summary
/// 价格表抓取服务：逐个证券请求日线，提取收盘价并拼成宽表，结果按参数缓存。
///
/// # Invariants
/// - 结果只取决于 `(lookback_days, tickers)`，二者共同构成缓存键。
/// - 单个证券失败不会中断整张表，该行被省略。
/// - 缓存故障只降级为未命中，不影响返回结果。
pub struct PriceTableService {
    // 外部行情源
    provider: Arc<dyn MarketDataProvider>,
    // 会话级缓存
    cache: Arc<dyn Cache>,
}

impl PriceTableService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, cache: Arc<dyn Cache>) -> Self {
        Self { provider, cache }
    }

    /// # Summary
    /// 构建缓存键。
    ///
    /// # Logic
    /// 将有序的 (名称, 代码) 列表序列化为 JSON，保证名称中的任意字符都不会造成键冲突。
    pub fn cache_key(lookback_days: u32, tickers: &TickerSet) -> Result<String, CacheError> {
        let snapshot =
            serde_json::to_string(tickers).map_err(|e| CacheError::Serialize(e.to_string()))?;
        Ok(format!("{}:{}:{}", KEY_PREFIX, lookback_days, snapshot))
    }

    /// # Summary
    /// 获取价格表。
    ///
    /// # Logic
    /// 1. 校验回溯天数为正。
    /// 2. 命中缓存则直接返回。
    /// 3. 否则按插入顺序逐个请求证券日线，只保留收盘价，以显示名称为行标签追加。
    /// 4. 请求失败的证券记录警告并省略。
    /// 5. 存在网络类失败时不写缓存，避免把暂时性缺行固化到整个会话。
    ///
    /// # Arguments
    /// * `lookback_days`: 回溯的自然日天数。
    /// * `tickers`: 有序的显示名称到代码映射。
    ///
    /// # Returns
    /// 价格表，行集合是 `tickers` 名称的子集。
    pub async fn fetch_price_table(
        &self,
        lookback_days: u32,
        tickers: &TickerSet,
    ) -> Result<PriceTable, TableError> {
        if lookback_days == 0 {
            return Err(TableError::InvalidLookback(lookback_days));
        }

        let key = Self::cache_key(lookback_days, tickers)?;
        match self.cache.get::<PriceTable>(&key).await {
            Ok(Some(table)) => {
                debug!("price table cache hit ({} days, {} tickers)", lookback_days, tickers.len());
                return Ok(table);
            }
            Ok(None) => {
                debug!("price table cache miss ({} days, {} tickers)", lookback_days, tickers.len());
            }
            Err(e) => warn!("price table cache read failed, refetching: {}", e),
        }

        let mut table = PriceTable::new();
        let mut transient_failure = false;
        for ticker in tickers {
            match self.provider.fetch_history(&ticker.symbol, lookback_days).await {
                Ok(bars) => {
                    debug!("{} ({}): {} bars", ticker.name, ticker.symbol, bars.len());
                    let closes: BTreeMap<_, _> = bars.iter().map(|b| (b.date, b.close)).collect();
                    table.append_row(ticker.name.clone(), &closes);
                }
                Err(e) => {
                    transient_failure |= matches!(e, MarketError::Network(_));
                    warn!("omitting {} ({}): {}", ticker.name, ticker.symbol, e);
                }
            }
        }

        info!(
            "price table built: {}/{} rows, {} dates, {} days",
            table.rows().len(),
            tickers.len(),
            table.dates().len(),
            lookback_days
        );

        if transient_failure {
            warn!("price table not cached because of network failures");
        } else if let Err(e) = self.cache.set(&key, &table).await {
            warn!("price table cache write failed: {}", e);
        }

        Ok(table)
    }

    /// # Summary
    /// 清空全部缓存的价格表。
    ///
    /// # Returns
    /// 被移除的条目数。
    pub async fn invalidate(&self) -> Result<usize, TableError> {
        let removed = self.cache.clear().await?;
        info!("price table cache invalidated, {} entries removed", removed);
        Ok(removed)
    }
}
