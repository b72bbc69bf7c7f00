//! # Vega-Lite 折线图描述
//!
//! 图表渲染交由前端的 Vega-Lite 运行时完成，这里只负责给出数据与通道绑定：
//! x 为交易日 (temporal)，y 为价格 (quantitative，定义域固定为用户选择的区间)，
//! color 为名称 (nominal)。

use crate::selection::PriceRange;
use kabuka_core::table::tidy::TidySeries;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
pub const DATE_FIELD: &str = "Date";
pub const NAME_FIELD: &str = "Name";
/// 线条透明度，便于辨认重叠的曲线
pub const LINE_OPACITY: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MeasureType {
    Temporal,
    Quantitative,
    Nominal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineMark {
    #[serde(rename = "type")]
    pub kind: String,
    pub opacity: f64,
    // 超出 y 轴定义域的部分被裁剪，而不是扩展坐标轴
    pub clip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldChannel {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: MeasureType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Scale {
    #[schema(value_type = Vec<f64>)]
    pub domain: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceChannel {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: MeasureType,
    // 始终为 null：多条曲线不堆叠
    pub stack: Option<bool>,
    pub scale: Scale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Encoding {
    pub x: FieldChannel,
    pub y: PriceChannel,
    pub color: FieldChannel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InlineData {
    #[schema(value_type = Vec<Object>)]
    pub values: Vec<Map<String, Value>>,
}

/// # Summary
/// 一个完整的 Vega-Lite 单视图折线图。
///
/// # Invariants
/// - `encoding.y.scale.domain` 等于构建时传入的价格区间，与数据实际范围无关。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineChartSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    // 宽度跟随容器
    pub width: String,
    pub data: InlineData,
    pub mark: LineMark,
    pub encoding: Encoding,
}

impl LineChartSpec {
    /// # Summary
    /// 由长表序列构建折线图。
    ///
    /// # Logic
    /// 1. 每个长表行转换为 `{Date, Name, <value_label>}` 记录，日期使用 ISO 格式。
    /// 2. y 通道字段名取自 `value_label`，定义域为 `[range.min, range.max]`。
    ///
    /// # Arguments
    /// * `tidy`: 已按选择裁剪的长表序列。
    /// * `range`: 用户指定的价格区间。
    pub fn from_tidy(tidy: &TidySeries, range: PriceRange) -> Self {
        let values = tidy
            .rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                record.insert(DATE_FIELD.to_string(), json!(row.date.format("%Y-%m-%d").to_string()));
                record.insert(NAME_FIELD.to_string(), json!(row.name));
                record.insert(tidy.value_label.clone(), json!(row.price));
                record
            })
            .collect();

        Self {
            schema: VEGA_LITE_SCHEMA.to_string(),
            width: "container".to_string(),
            data: InlineData { values },
            mark: LineMark {
                kind: "line".to_string(),
                opacity: LINE_OPACITY,
                clip: true,
            },
            encoding: Encoding {
                x: FieldChannel {
                    field: DATE_FIELD.to_string(),
                    kind: MeasureType::Temporal,
                },
                y: PriceChannel {
                    field: tidy.value_label.clone(),
                    kind: MeasureType::Quantitative,
                    stack: None,
                    scale: Scale {
                        domain: [range.min(), range.max()],
                    },
                },
                color: FieldChannel {
                    field: NAME_FIELD.to_string(),
                    kind: MeasureType::Nominal,
                },
            },
        }
    }

    /// y 轴定义域
    pub fn y_domain(&self) -> [f64; 2] {
        self.encoding.y.scale.domain
    }
}
