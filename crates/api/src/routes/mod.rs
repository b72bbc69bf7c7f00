//! # 路由控制器
//!
//! 每个子模块对应一组 REST 资源，Handler 通过 `utoipa::path` 注册到 OpenAPI 文档。

pub mod admin;
pub mod dashboard;
pub mod segment;
