use crate::common::TickerSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Summary
/// 价格轴滑块允许的取值范围。
///
/// # Invariants
/// - `min <= max`，且二者均为有限值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceBounds {
    #[schema(example = 0.0)]
    pub min: f64,
    #[schema(example = 500.0)]
    pub max: f64,
}

impl PriceBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// 判断 `[lo, hi]` 是否完整落在范围之内
    pub fn contains_range(&self, lo: f64, hi: f64) -> bool {
        lo >= self.min && hi <= self.max
    }
}

/// # Summary
/// 看板上的一个市场分区 (例如美股、日股)，各自拥有代码集合、货币单位与价格范围。
///
/// # Invariants
/// - `id` 在全部分区中唯一。
/// - `enabled == false` 的分区不会被抓取，也不会对外暴露。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSegment {
    // 分区标识，用于路由
    pub id: String,
    // 分区标题
    pub title: String,
    // 货币单位 (USD, JPY)
    pub unit: String,
    // 有序代码集合
    pub tickers: TickerSet,
    // 价格滑块范围
    pub price_bounds: PriceBounds,
    // 是否启用
    pub enabled: bool,
}

impl MarketSegment {
    /// 整洁序列中数值列的标签，例如 `Stock Prices(USD)`
    pub fn value_label(&self) -> String {
        format!("Stock Prices({})", self.unit)
    }
}

/// 美国主要股票
pub fn us_equities() -> MarketSegment {
    MarketSegment {
        id: "us".to_string(),
        title: "US major stocks".to_string(),
        unit: "USD".to_string(),
        tickers: TickerSet::from_pairs([
            ("google", "GOOGL"),
            ("amazon", "AMZN"),
            ("facebook", "META"),
            ("apple", "AAPL"),
            ("microsoft", "MSFT"),
            ("netflix", "NFLX"),
            ("tesla", "TSLA"),
        ]),
        price_bounds: PriceBounds::new(0.0, 500.0),
        enabled: true,
    }
}

/// 东证主要股票
pub fn jp_equities() -> MarketSegment {
    MarketSegment {
        id: "jp".to_string(),
        title: "Nikkei major stocks".to_string(),
        unit: "JPY".to_string(),
        tickers: TickerSet::from_pairs([
            ("ソフトバンクグループ㈱", "9984.T"),
            ("楽天グループ㈱", "4755.T"),
            ("東京電力ホールディングス㈱", "9501.T"),
            ("㈱滋賀銀行", "8366.T"),
            ("㈱京都銀行", "8369.T"),
        ]),
        price_bounds: PriceBounds::new(0.0, 8500.0),
        enabled: true,
    }
}

/// # Summary
/// 投资信托分区。
///
/// # Invariants
/// - 保持禁用：Yahoo 无法解析这些基金代码，在代码格式问题解决前不抓取。
pub fn investment_funds() -> MarketSegment {
    MarketSegment {
        id: "funds".to_string(),
        title: "Investment trusts".to_string(),
        unit: "JPY".to_string(),
        tickers: TickerSet::from_pairs([
            ("SBI・V・S&P500インデックス・ファンド", "89311199"),
            ("eMAXIS Slim全世界株式(除く日本)", "03316183"),
            ("ニッセイ 外国債券インデックスファンド", "2931213C"),
            ("eMAXIS Slim全世界株式(オール･カントリー)", "0331418A"),
            ("ひふみプラス", "9C311125"),
        ]),
        price_bounds: PriceBounds::new(0.0, 8500.0),
        enabled: false,
    }
}

/// 全部预置分区 (含禁用分区)，按看板显示顺序排列
pub fn presets() -> Vec<MarketSegment> {
    vec![us_equities(), jp_equities(), investment_funds()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_have_unique_ids() {
        let segments = presets();
        let mut ids: Vec<&str> = segments.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), segments.len());
    }

    #[test]
    fn test_fund_segment_is_disabled() {
        assert!(!investment_funds().enabled);
        assert!(us_equities().enabled);
        assert!(jp_equities().enabled);
    }

    #[test]
    fn test_value_label_and_bounds() {
        let us = us_equities();
        assert_eq!(us.value_label(), "Stock Prices(USD)");
        assert_eq!(us.tickers.default_selection(), vec!["google", "amazon", "facebook", "apple"]);
        assert!(us.price_bounds.contains_range(0.0, 500.0));
        assert!(!us.price_bounds.contains_range(-1.0, 100.0));
        assert!(!jp_equities().price_bounds.contains_range(0.0, 9000.0));
    }
}
