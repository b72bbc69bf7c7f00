//! # 配置加载
//!
//! 分层合并：内置默认值 → 可选的 TOML 文件 → `KABUKA__` 前缀的环境变量。

use config::{Config, ConfigError, Environment, File};
use kabuka_core::config::AppConfig;
use std::path::Path;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/kabuka.toml";
/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "KABUKA_CONFIG";
const ENV_PREFIX: &str = "KABUKA";
const ENV_SEPARATOR: &str = "__";

/// # Summary
/// 从进程环境加载配置。
///
/// # Logic
/// 1. 文件路径取 `KABUKA_CONFIG`，缺省为 `config/kabuka.toml`，文件不存在时跳过。
/// 2. 叠加环境变量，如 `KABUKA__SERVER__PORT=9000`。
/// 3. 校验回溯天数配置。
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    build(Path::new(&path), environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

/// 按给定文件与环境变量源构建配置
pub fn build(path: &Path, env: Environment) -> Result<AppConfig, ConfigError> {
    let app: AppConfig = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(env)
        .build()?
        .try_deserialize()?;

    app.dashboard
        .lookback
        .validate()
        .map_err(|e| ConfigError::Message(format!("dashboard.lookback: {}", e)))?;
    Ok(app)
}
