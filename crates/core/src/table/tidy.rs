use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 长表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TidyRow {
    pub date: NaiveDate,
    #[schema(example = "apple")]
    pub name: String,
    #[schema(example = 231.5)]
    pub price: f64,
}

/// # Summary
/// 价格表的长表形式，每个 (日期, 名称, 价格) 一行。
///
/// # Invariants
/// - 不包含缺失值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TidySeries {
    // 数值列标签
    #[schema(example = "Stock Prices(USD)")]
    pub value_label: String,
    pub rows: Vec<TidyRow>,
}

impl TidySeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
