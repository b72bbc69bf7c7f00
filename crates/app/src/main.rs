mod settings;

use std::sync::Arc;

use kabuka_api::server::{AppState, start_server};
use kabuka_cache::mem::MemCache;
use kabuka_core::common::segment;
use kabuka_core::config::LogConfig;
use kabuka_dashboard::service::DashboardService;
use kabuka_feed::yahoo::YahooProvider;
use kabuka_market::table::PriceTableService;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 DashboardService。
///
/// # Logic
/// 1. 加载分层配置。
/// 2. 初始化全局日志。
/// 3. 实例化基础设施层（Feed、Cache）。
/// 4. 构造应用服务层（PriceTableService、DashboardService）。
/// 5. 启动 HTTP 服务，收到退出信号后优雅停机。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config = settings::load()?;

    // 2. 初始化日志 (guard 必须存活到进程退出，否则文件日志会丢失)
    let _log_guard = init_tracing(&config.log)?;
    info!("Kabuka dashboard starting...");

    // 3. 实例化基础设施层
    let feed = Arc::new(YahooProvider::new(&config.provider)?);
    let cache = Arc::new(MemCache::new());

    // 4. 构造应用服务层
    let tables = Arc::new(PriceTableService::new(feed, cache));
    let dashboard = Arc::new(DashboardService::new(
        tables,
        segment::presets(),
        config.dashboard.clone(),
    ));
    info!(
        "DashboardService initialized with {} segments",
        dashboard.segments().len()
    );

    // 5. 启动 HTTP 服务
    let state = AppState { dashboard };
    start_server(state, &config.server.bind_addr(), shutdown_signal()).await?;

    info!("Shutdown complete.");
    Ok(())
}

/// # Summary
/// 安装全局 tracing 订阅者。
///
/// # Logic
/// 1. 过滤级别优先取 `RUST_LOG`，否则取配置 `log.level`。
/// 2. 始终输出到终端；配置了 `log.dir` 时额外按天滚动写入文件。
///
/// # Returns
/// 文件日志的后台写入 guard；未启用文件日志时为 None。
fn init_tracing(log: &LogConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.level)?,
    };
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer());

    match &log.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "kabuka.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init()?;
            Ok(None)
        }
    }
}

/// 等待 Ctrl-C；监听失败时记录错误并保持运行
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
