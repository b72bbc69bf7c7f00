use crate::error::DashboardError;
use kabuka_core::common::segment::PriceBounds;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Summary
/// 价格轴的显示区间 `[min, max]`。
///
/// # Invariants
/// - 两端均为有限值且 `min <= max`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceRange {
    #[schema(example = 0.0)]
    min: f64,
    #[schema(example = 500.0)]
    max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self, DashboardError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(DashboardError::InvalidPriceRange(format!(
                "bounds must be finite, got [{}, {}]",
                min, max
            )));
        }
        if min > max {
            return Err(DashboardError::InvalidPriceRange(format!(
                "min {} is greater than max {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// 分区滑块的完整范围
    pub fn full(bounds: &PriceBounds) -> Self {
        Self {
            min: bounds.min,
            max: bounds.max,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, price: f64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

/// # Summary
/// 单个分区的交互状态，字段缺省时使用分区默认值。
///
/// # Invariants
/// - `selection == None` 表示使用默认选中项；`Some(vec![])` 表示用户清空了选择。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SegmentState {
    #[schema(example = "us")]
    pub id: String,
    pub selection: Option<Vec<String>>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

/// # Summary
/// 整个看板的交互状态，每次交互后整体提交。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardState {
    // 缺省时使用配置的默认回溯天数
    #[schema(example = 180)]
    pub lookback_days: Option<u32>,
    // 未出现的分区使用默认状态
    #[serde(default)]
    pub segments: Vec<SegmentState>,
}

impl DashboardState {
    pub fn segment(&self, id: &str) -> Option<&SegmentState> {
        self.segments.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_range_validation() {
        assert!(PriceRange::new(0.0, 500.0).is_ok());
        assert!(PriceRange::new(100.0, 100.0).is_ok());
        assert!(matches!(
            PriceRange::new(300.0, 200.0),
            Err(DashboardError::InvalidPriceRange(_))
        ));
        assert!(PriceRange::new(f64::NAN, 1.0).is_err());
        assert!(PriceRange::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_state_deserializes_without_segments() {
        let state: DashboardState = serde_json::from_str(r#"{"lookback_days":30}"#).unwrap();
        assert_eq!(state.lookback_days, Some(30));
        assert!(state.segment("us").is_none());

        let state: DashboardState =
            serde_json::from_str(r#"{"segments":[{"id":"jp","selection":[]}]}"#).unwrap();
        assert_eq!(state.segment("jp").unwrap().selection, Some(vec![]));
    }
}
