//! # `kabuka-core` - 领域模型与端口定义
//!
//! 股价看板的核心层，只包含纯数据结构与 trait，不依赖任何具体实现。
//!
//! ## 模块
//! - `common`: 证券代码集合、市场分区、日期标签格式
//! - `market`: 行情数据提供者端口与日线实体
//! - `cache`: 业务无关的 KV 缓存端口
//! - `table`: 价格表 (宽表) 与整洁序列 (长表)
//! - `config`: 全局应用配置

pub mod cache;
pub mod common;
pub mod config;
pub mod market;
pub mod table;

#[cfg(feature = "test-utils")]
pub mod test_utils;
