use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use kabuka_core::config::ProviderConfig;
use kabuka_core::market::entity::DailyBar;
use kabuka_core::market::error::MarketError;
use kabuka_core::market::port::MarketDataProvider;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 交易日按交易所当地时区 (响应中的 `gmtoffset`) 计算。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// API 根地址，测试时可指向本地桩服务
    base_url: String,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 安装 rustls 的 ring 加密后端 (已安装时忽略)。
    /// 2. 按配置设置超时与 User-Agent，减少被拦截风险。
    /// 3. 初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 行情源配置。
    ///
    /// # Returns
    /// 成功返回 YahooProvider，客户端构建失败返回 `MarketError::Network`。
    pub fn new(config: &ProviderConfig) -> Result<Self, MarketError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let user_agent = config
            .user_agent
            .parse()
            .map_err(|e| MarketError::Network(format!("invalid user agent: {}", e)))?;
        headers.insert(reqwest::header::USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
pub(crate) struct YahooResponse {
    chart: YahooChart,
}

#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
struct YahooError {
    code: Option<String>,
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。
///
/// # Invariants
/// - 查询区间内无成交时 `timestamp` 缺失。
#[derive(Deserialize, Debug)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    // 交易所相对 UTC 的秒数偏移
    #[serde(default)]
    gmtoffset: i32,
    #[serde(default)]
    exchange_timezone_name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据，数组与 `timestamp` 按下标对齐。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// # Summary
/// 将 chart 响应转换为日线列表。
///
/// # Logic
/// 1. 响应携带 error 时，"Not Found" 映射为 NotFound，其余映射为 Unknown。
/// 2. 以 `gmtoffset` 将时间戳换算为交易所当地日期。
/// 3. 跳过收盘价缺失的记录；开高低缺失时以收盘价补齐。
/// 4. 同一日期出现多次时保留最后一条 (盘中实时 K 线)。
pub(crate) fn parse_chart(
    response: YahooResponse,
    symbol: &str,
) -> Result<Vec<DailyBar>, MarketError> {
    if let Some(err) = response.chart.error {
        return match err.code.as_deref() {
            Some("Not Found") => Err(MarketError::NotFound(symbol.to_string())),
            _ => Err(MarketError::Unknown(err.description)),
        };
    }

    let result = response
        .chart
        .result
        .and_then(|mut r| r.pop())
        .ok_or_else(|| MarketError::NotFound(symbol.to_string()))?;

    let offset = FixedOffset::east_opt(result.meta.gmtoffset).ok_or_else(|| {
        MarketError::Parse(format!("invalid gmtoffset {}", result.meta.gmtoffset))
    })?;
    debug!(
        "{}: {} points, exchange timezone {:?}",
        symbol,
        result.timestamp.len(),
        result.meta.exchange_timezone_name
    );

    let Some(quote) = result.indicators.quote.first() else {
        return Err(MarketError::NotFound(symbol.to_string()));
    };

    let mut bars: Vec<DailyBar> = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let date = local_date(ts, &offset)?;
        let bar = DailyBar {
            date,
            open: quote.open.get(i).copied().flatten().unwrap_or(close),
            high: quote.high.get(i).copied().flatten().unwrap_or(close),
            low: quote.low.get(i).copied().flatten().unwrap_or(close),
            close,
            volume: quote.volume.get(i).copied().flatten(),
        };
        match bars.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => bars.push(bar),
        }
    }

    if bars.is_empty() {
        return Err(MarketError::NotFound(symbol.to_string()));
    }
    Ok(bars)
}

fn local_date(ts: i64, offset: &FixedOffset) -> Result<NaiveDate, MarketError> {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(offset).date_naive())
        .ok_or_else(|| MarketError::Parse(format!("timestamp out of range: {}", ts)))
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取日线历史数据。
    ///
    /// # Logic
    /// 1. 构建 `range={days}d&interval=1d` 的 chart 请求。
    /// 2. 404 响应体同样是 chart 结构，交由解析逻辑映射为 NotFound。
    /// 3. 其余非 2xx 状态视为网络错误。
    async fn fetch_history(
        &self,
        symbol: &str,
        period_days: u32,
    ) -> Result<Vec<DailyBar>, MarketError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let range = format!("{}d", period_days);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", range.as_str()),
                ("interval", "1d"),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(MarketError::Network(format!("HTTP {}", status)));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        parse_chart(json, symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str, symbol: &str) -> Result<Vec<DailyBar>, MarketError> {
        let response: YahooResponse = serde_json::from_str(body).unwrap();
        parse_chart(response, symbol)
    }

    #[test]
    fn test_parse_tokyo_dates_use_exchange_offset() {
        // 2026-10-15 00:00 JST == 2026-10-14 15:00 UTC
        let body = r#"{"chart":{"result":[{
            "meta":{"currency":"JPY","symbol":"9984.T","gmtoffset":32400,"exchangeTimezoneName":"Asia/Tokyo"},
            "timestamp":[1791990000,1792076400],
            "indicators":{"quote":[{
                "open":[8100.0,8200.0],"high":[8300.0,8250.0],"low":[8000.0,8100.0],
                "close":[8210.0,8150.0],"volume":[1000,2000]}],
                "adjclose":[{"adjclose":[8210.0,8150.0]}]}
        }],"error":null}}"#;

        let bars = parse(body, "9984.T").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(bars[0].close, 8210.0);
        assert_eq!(bars[1].volume, Some(2000.0));
    }

    #[test]
    fn test_parse_skips_missing_close_and_dedups_dates() {
        // 纽约 09:30 开盘 (UTC-4)，最后两条为同一交易日
        let body = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":-14400},
            "timestamp":[1791207000,1791293400,1791379800,1791397800],
            "indicators":{"quote":[{
                "open":[1.0,2.0,3.0,3.1],"high":[1.0,2.0,3.0,3.2],"low":[1.0,2.0,3.0,3.0],
                "close":[1.5,null,3.5,3.6],"volume":[10,20,30,40]}]}
        }],"error":null}}"#;

        let bars = parse(body, "AAPL").unwrap();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.5, 3.6]);
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn test_parse_not_found_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert_eq!(
            parse(body, "89311199"),
            Err(MarketError::NotFound("89311199".to_string()))
        );
    }

    #[test]
    fn test_parse_other_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - interval=1d is not supported"}}}"#;
        assert!(matches!(parse(body, "AAPL"), Err(MarketError::Unknown(_))));
    }

    #[test]
    fn test_parse_result_without_timestamps() {
        let body = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":0},
            "indicators":{"quote":[{}]}
        }],"error":null}}"#;
        assert_eq!(parse(body, "X"), Err(MarketError::NotFound("X".to_string())));
    }
}
