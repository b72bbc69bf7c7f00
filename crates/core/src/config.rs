use crate::common::DateLabelFormat;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
    pub provider: ProviderConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub lookback: LookbackConfig,
    pub date_label_format: DateLabelFormat,
}

/// # Summary
/// 回溯天数滑块配置。
///
/// # Invariants
/// - `1 <= min_days <= default_days <= max_days`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookbackConfig {
    pub min_days: u32,
    pub max_days: u32,
    pub default_days: u32,
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            min_days: 1,
            max_days: 365,
            default_days: 180,
        }
    }
}

impl LookbackConfig {
    pub fn contains(&self, days: u32) -> bool {
        (self.min_days..=self.max_days).contains(&days)
    }

    /// 校验配置自身的一致性
    pub fn validate(&self) -> Result<(), String> {
        if self.min_days == 0 {
            return Err("lookback.min_days must be positive".to_string());
        }
        if !(self.min_days <= self.default_days && self.default_days <= self.max_days) {
            return Err(format!(
                "lookback requires min_days <= default_days <= max_days, got {} / {} / {}",
                self.min_days, self.default_days, self.max_days
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // EnvFilter 指令，RUST_LOG 优先
    pub level: String,
    // 设置后额外写入按天滚动的日志文件
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}
