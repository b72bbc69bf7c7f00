use crate::error::DashboardError;
use crate::selection::{DashboardState, PriceRange, SegmentState};
use crate::view::{SegmentInput, SegmentView, render_segment};
use kabuka_core::common::segment::{MarketSegment, PriceBounds};
use kabuka_core::common::{DateLabelFormat, Ticker};
use kabuka_core::config::{DashboardConfig, LookbackConfig};
use kabuka_core::table::PriceTable;
use kabuka_market::table::PriceTableService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

/// 分区目录项，前端据此构建多选框与价格滑块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SegmentSummary {
    #[schema(example = "us")]
    pub id: String,
    #[schema(example = "US major stocks")]
    pub title: String,
    #[schema(example = "USD")]
    pub unit: String,
    #[schema(example = "Stock Prices(USD)")]
    pub value_label: String,
    pub tickers: Vec<Ticker>,
    pub default_selection: Vec<String>,
    pub price_bounds: PriceBounds,
}

impl From<&MarketSegment> for SegmentSummary {
    fn from(s: &MarketSegment) -> Self {
        Self {
            id: s.id.clone(),
            title: s.title.clone(),
            unit: s.unit.clone(),
            value_label: s.value_label(),
            tickers: s.tickers.iter().cloned().collect(),
            default_selection: s.tickers.default_selection(),
            price_bounds: s.price_bounds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LookbackBounds {
    #[schema(example = 1)]
    pub min_days: u32,
    #[schema(example = 365)]
    pub max_days: u32,
    #[schema(example = 180)]
    pub default_days: u32,
}

impl From<LookbackConfig> for LookbackBounds {
    fn from(c: LookbackConfig) -> Self {
        Self {
            min_days: c.min_days,
            max_days: c.max_days,
            default_days: c.default_days,
        }
    }
}

/// 看板目录：全部控件的取值范围与默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardCatalogue {
    pub lookback: LookbackBounds,
    pub date_label_format: DateLabelFormat,
    pub segments: Vec<SegmentSummary>,
}

/// 整个看板的一次渲染结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardView {
    pub lookback_days: u32,
    pub segments: Vec<SegmentView>,
}

/// # Summary
/// 看板应用服务 (Facade)：校验交互状态、取得价格表并调用纯渲染函数。
///
/// # Invariants
/// - 只持有启用的分区，禁用分区对外不可见。
/// - 每次渲染都从价格表缓存重新计算，不保存任何会话状态。
pub struct DashboardService {
    // 价格表抓取服务 (带缓存)
    tables: Arc<PriceTableService>,
    // 启用的分区，按显示顺序
    segments: Vec<MarketSegment>,
    // 看板配置
    config: DashboardConfig,
}

impl DashboardService {
    /// # Summary
    /// 创建看板服务。
    ///
    /// # Logic
    /// 过滤掉 `enabled == false` 的分区。
    pub fn new(
        tables: Arc<PriceTableService>,
        segments: Vec<MarketSegment>,
        config: DashboardConfig,
    ) -> Self {
        let segments = segments.into_iter().filter(|s| s.enabled).collect();
        Self {
            tables,
            segments,
            config,
        }
    }

    pub fn segments(&self) -> &[MarketSegment] {
        &self.segments
    }

    pub fn catalogue(&self) -> DashboardCatalogue {
        DashboardCatalogue {
            lookback: self.config.lookback.into(),
            date_label_format: self.config.date_label_format,
            segments: self.segments.iter().map(SegmentSummary::from).collect(),
        }
    }

    pub fn date_label_format(&self) -> DateLabelFormat {
        self.config.date_label_format
    }

    pub fn segment(&self, id: &str) -> Result<&MarketSegment, DashboardError> {
        self.segments
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| DashboardError::UnknownSegment(id.to_string()))
    }

    /// # Summary
    /// 解析回溯天数。
    ///
    /// # Logic
    /// 缺省使用配置默认值；超出 `[min_days, max_days]` 时报错。
    pub fn resolve_lookback(&self, days: Option<u32>) -> Result<u32, DashboardError> {
        let lookback = self.config.lookback;
        let days = days.unwrap_or(lookback.default_days);
        if !lookback.contains(days) {
            return Err(DashboardError::InvalidLookback {
                days,
                min: lookback.min_days,
                max: lookback.max_days,
            });
        }
        Ok(days)
    }

    /// # Summary
    /// 解析价格区间。
    ///
    /// # Logic
    /// 1. 缺省端取分区滑块的边界。
    /// 2. 区间必须合法且完整落在滑块范围之内。
    pub fn resolve_price_range(
        &self,
        segment: &MarketSegment,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<PriceRange, DashboardError> {
        let bounds = segment.price_bounds;
        let range = PriceRange::new(min.unwrap_or(bounds.min), max.unwrap_or(bounds.max))?;
        if !bounds.contains_range(range.min(), range.max()) {
            return Err(DashboardError::InvalidPriceRange(format!(
                "[{}, {}] is outside the {} slider range [{}, {}]",
                range.min(),
                range.max(),
                segment.id,
                bounds.min,
                bounds.max
            )));
        }
        Ok(range)
    }

    /// 取得分区的完整价格表
    pub async fn price_table(
        &self,
        segment_id: &str,
        lookback_days: Option<u32>,
    ) -> Result<PriceTable, DashboardError> {
        let segment = self.segment(segment_id)?;
        let days = self.resolve_lookback(lookback_days)?;
        Ok(self.tables.fetch_price_table(days, &segment.tickers).await?)
    }

    /// # Summary
    /// 渲染单个分区。
    ///
    /// # Logic
    /// 1. 校验分区、回溯天数、价格区间，以及选择中的名称都属于该分区。
    /// 2. 通过缓存取得价格表。
    /// 3. 调用纯函数 `render_segment` 生成视图。
    ///
    /// # Arguments
    /// * `lookback_days`: 回溯天数，None 使用默认值。
    /// * `state`: 分区交互状态。
    ///
    /// # Returns
    /// 分区视图；参数非法时返回 DashboardError。
    pub async fn render_segment(
        &self,
        lookback_days: Option<u32>,
        state: &SegmentState,
    ) -> Result<SegmentView, DashboardError> {
        let segment = self.segment(&state.id)?;
        let days = self.resolve_lookback(lookback_days)?;
        let price_range = self.resolve_price_range(segment, state.price_min, state.price_max)?;

        if let Some(names) = &state.selection
            && let Some(unknown) = names.iter().find(|n| !segment.tickers.contains(n))
        {
            return Err(DashboardError::UnknownEntity {
                segment: segment.id.clone(),
                name: unknown.clone(),
            });
        }

        let table = self.tables.fetch_price_table(days, &segment.tickers).await?;
        debug!(
            "rendering segment {} ({} days, selection {:?})",
            segment.id, days, state.selection
        );

        Ok(render_segment(SegmentInput {
            segment,
            lookback_days: days,
            table: &table,
            selection: state.selection.as_deref(),
            price_range,
            date_format: self.config.date_label_format,
        }))
    }

    /// # Summary
    /// 渲染整个看板：`render(state) -> view`。
    ///
    /// # Logic
    /// 1. 引用了不存在分区的状态直接报错。
    /// 2. 按显示顺序渲染每个启用分区，未提供状态的分区使用默认状态。
    /// 3. 某个分区的空选择只影响该分区。
    pub async fn render(&self, state: &DashboardState) -> Result<DashboardView, DashboardError> {
        if let Some(unknown) = state.segments.iter().find(|s| self.segment(&s.id).is_err()) {
            return Err(DashboardError::UnknownSegment(unknown.id.clone()));
        }
        let days = self.resolve_lookback(state.lookback_days)?;

        let mut views = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let segment_state = state.segment(&segment.id).cloned().unwrap_or(SegmentState {
                id: segment.id.clone(),
                ..SegmentState::default()
            });
            views.push(self.render_segment(Some(days), &segment_state).await?);
        }

        Ok(DashboardView {
            lookback_days: days,
            segments: views,
        })
    }

    /// 清空价格表缓存，返回移除的条目数
    pub async fn invalidate(&self) -> Result<usize, DashboardError> {
        Ok(self.tables.invalidate().await?)
    }
}
