//! # 价格表
//!
//! 宽表：行为显示名称，列为交易日，单元格为收盘价。
//! 长表 (`TidySeries`)：每个 (日期, 名称, 价格) 一行，是图表的直接输入。

pub mod tidy;

use crate::common::DateLabelFormat;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tidy::{TidyRow, TidySeries};
use utoipa::ToSchema;

/// # Summary
/// 价格表中的一行。
///
/// # Invariants
/// - `closes.len()` 等于所属表的交易日列数，按列顺序对齐。
/// - `None` 表示该证券在该交易日没有成交记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceRow {
    // 显示名称
    #[schema(example = "apple")]
    pub name: String,
    // 各交易日收盘价
    pub closes: Vec<Option<f64>>,
}

impl PriceRow {
    /// 以 (日期, 收盘价) 形式遍历非空单元格
    pub fn observations<'a>(
        &'a self,
        dates: &'a [NaiveDate],
    ) -> impl Iterator<Item = (NaiveDate, f64)> + 'a {
        dates
            .iter()
            .zip(self.closes.iter())
            .filter_map(|(date, close)| close.map(|c| (*date, c)))
    }
}

/// # Summary
/// 以显示名称为行、交易日为列的收盘价宽表。
///
/// # Invariants
/// - 行名称唯一。
/// - `dates` 严格升序，是所有行观测日期的并集。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceTable {
    // 列：交易日 (升序)
    dates: Vec<NaiveDate>,
    // 行：按追加顺序排列
    rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn row(&self, name: &str) -> Option<&PriceRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.row(name).is_some()
    }

    /// 按行顺序返回行名称
    pub fn row_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按指定格式渲染全部列标签
    pub fn column_labels(&self, format: DateLabelFormat) -> Vec<String> {
        self.dates.iter().map(|d| format.label(*d)).collect()
    }

    /// # Summary
    /// 追加一个证券的收盘价序列作为新行。
    ///
    /// # Logic
    /// 1. 将序列中出现的新日期并入列集合，已有行在新列上填充 `None`。
    /// 2. 按列顺序对齐序列生成新行。
    /// 3. 同名行已存在时原位替换，保持名称唯一。
    ///
    /// # Arguments
    /// * `name`: 行标签 (显示名称)。
    /// * `series`: 交易日到收盘价的映射。
    pub fn append_row(&mut self, name: impl Into<String>, series: &BTreeMap<NaiveDate, f64>) {
        let name = name.into();

        let mut merged: BTreeSet<NaiveDate> = self.dates.iter().copied().collect();
        merged.extend(series.keys().copied());
        if merged.len() != self.dates.len() {
            let merged: Vec<NaiveDate> = merged.into_iter().collect();
            for row in &mut self.rows {
                let old: BTreeMap<NaiveDate, f64> = row.observations(&self.dates).collect();
                row.closes = merged.iter().map(|d| old.get(d).copied()).collect();
            }
            self.dates = merged;
        }

        let closes: Vec<Option<f64>> = self.dates.iter().map(|d| series.get(d).copied()).collect();
        match self.rows.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.closes = closes,
            None => self.rows.push(PriceRow { name, closes }),
        }
    }

    /// # Summary
    /// 按名称切片并按行标签排序。
    ///
    /// # Logic
    /// 1. 保留名称出现在 `names` 中的行，表中不存在的名称直接忽略。
    /// 2. 按名称字典序排序；列集合保持不变。
    ///
    /// # Arguments
    /// * `names`: 选中的显示名称。
    ///
    /// # Returns
    /// 新的价格表。
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> PriceTable {
        let wanted: BTreeSet<&str> = names.iter().map(|n| n.as_ref()).collect();
        let mut rows: Vec<PriceRow> = self
            .rows
            .iter()
            .filter(|r| wanted.contains(r.name.as_str()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        PriceTable {
            dates: self.dates.clone(),
            rows,
        }
    }

    /// # Summary
    /// 宽表转长表。
    ///
    /// # Logic
    /// 按行顺序、再按日期顺序展开每个非空单元格。
    ///
    /// # Arguments
    /// * `value_label`: 数值列标签，例如 `Stock Prices(USD)`。
    pub fn to_tidy(&self, value_label: impl Into<String>) -> TidySeries {
        let rows = self
            .rows
            .iter()
            .flat_map(|row| {
                row.observations(&self.dates).map(|(date, price)| TidyRow {
                    date,
                    name: row.name.clone(),
                    price,
                })
            })
            .collect();
        TidySeries {
            value_label: value_label.into(),
            rows,
        }
    }
}
