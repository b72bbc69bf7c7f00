//! # `kabuka-api` - HTTP API 网关
//!
//! 本 crate 是 Kabuka 股价看板的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自浏览器前端的看板交互请求
//! - 调用下层 `DashboardService` 完成取数、校验与渲染
//! - 将看板域错误统一映射为 HTTP 状态码与 JSON 错误体

pub mod types;
pub mod error;
pub mod routes;
pub mod server;
