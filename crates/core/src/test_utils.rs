//! 测试辅助：可编排的内存行情提供者。

use crate::market::entity::DailyBar;
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// # Summary
/// 预置收盘价序列的行情提供者，记录每次调用。
///
/// # Invariants
/// - 未预置的代码返回 `MarketError::NotFound`。
/// - 标记为失败的代码返回 `MarketError::Network`。
#[derive(Default)]
pub struct ScriptedProvider {
    series: DashMap<String, Vec<DailyBar>>,
    failing: DashSet<String>,
    calls: AtomicUsize,
    calls_by_symbol: DashMap<String, usize>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 (日期, 收盘价) 预置某个代码的日线
    pub fn with_closes(self, symbol: &str, closes: &[(NaiveDate, f64)]) -> Self {
        let bars = closes
            .iter()
            .map(|(date, close)| DailyBar {
                date: *date,
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: Some(1000.0),
            })
            .collect();
        self.series.insert(symbol.to_string(), bars);
        self
    }

    /// 令某个代码的请求始终失败
    pub fn failing(self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    /// 总调用次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 某个代码的调用次数
    pub fn calls_for(&self, symbol: &str) -> usize {
        self.calls_by_symbol.get(symbol).map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl MarketDataProvider for ScriptedProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        _period_days: u32,
    ) -> Result<Vec<DailyBar>, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.calls_by_symbol.entry(symbol.to_string()).or_insert(0) += 1;

        if self.failing.contains(symbol) {
            return Err(MarketError::Network(format!("connection refused: {}", symbol)));
        }
        self.series
            .get(symbol)
            .map(|bars| bars.clone())
            .ok_or_else(|| MarketError::NotFound(symbol.to_string()))
    }
}
