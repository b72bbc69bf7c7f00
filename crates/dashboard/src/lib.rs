//! # `kabuka-dashboard` - 看板渲染
//!
//! 将价格表与用户选择转换为可直接交给前端的视图：
//! 多选项与默认值、排序后的价格表、长表序列以及 Vega-Lite 折线图描述。
//! `view::render_segment` 是纯函数，`service::DashboardService` 负责取数与参数校验。

pub mod chart;
pub mod error;
pub mod selection;
pub mod service;
pub mod view;
