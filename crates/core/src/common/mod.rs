pub mod segment;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// 多选框默认选中的条目数。
pub const DEFAULT_SELECTION_SIZE: usize = 4;

/// # Summary
/// 单个证券条目：面向用户的显示名称与行情提供者使用的代码。
///
/// # Invariants
/// - `symbol` 必须是提供者可识别的代码 (例如: AAPL, 9984.T)。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Ticker {
    // 显示名称，同时作为价格表的行标签
    #[schema(example = "apple")]
    pub name: String,
    // 提供者侧的证券代码
    #[schema(example = "AAPL")]
    pub symbol: String,
}

/// # Summary
/// 有序的 "显示名称 -> 证券代码" 映射。
///
/// # Invariants
/// - 显示名称唯一。重复插入同名条目时仅替换代码，保留原有位置。
/// - 插入顺序有意义：决定默认选中项与抓取顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct TickerSet {
    tickers: Vec<Ticker>,
}

impl TickerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Summary
    /// 由 (名称, 代码) 序列构建映射。
    ///
    /// # Arguments
    /// * `pairs`: 按插入顺序排列的条目。
    ///
    /// # Returns
    /// 新的 TickerSet。
    pub fn from_pairs<I, N, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (name, symbol) in pairs {
            set.insert(name, symbol);
        }
        set
    }

    /// # Summary
    /// 插入或更新一个条目。
    ///
    /// # Logic
    /// 1. 若名称已存在，仅替换代码。
    /// 2. 否则追加到末尾。
    pub fn insert(&mut self, name: impl Into<String>, symbol: impl Into<String>) {
        let name = name.into();
        let symbol = symbol.into();
        match self.tickers.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.symbol = symbol,
            None => self.tickers.push(Ticker { name, symbol }),
        }
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticker> {
        self.tickers.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tickers.iter().any(|t| t.name == name)
    }

    /// # Summary
    /// 多选框的默认选中项。
    ///
    /// # Logic
    /// 取插入顺序下的前 `DEFAULT_SELECTION_SIZE` 个名称；条目不足时返回全部。
    ///
    /// # Returns
    /// 名称列表 (保持插入顺序)。
    pub fn default_selection(&self) -> Vec<String> {
        self.tickers
            .iter()
            .take(DEFAULT_SELECTION_SIZE)
            .map(|t| t.name.clone())
            .collect()
    }
}

impl<'a> IntoIterator for &'a TickerSet {
    type Item = &'a Ticker;
    type IntoIter = std::slice::Iter<'a, Ticker>;

    fn into_iter(self) -> Self::IntoIter {
        self.tickers.iter()
    }
}

/// # Summary
/// 价格表列标签 (交易日) 的显示格式。
///
/// # Invariants
/// - 仅影响展示；整洁序列与图表始终使用 ISO 日期。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateLabelFormat {
    // 2026-10-16
    #[default]
    Raw,
    // 16 October 2026
    HumanReadable,
}

impl DateLabelFormat {
    /// 按当前格式渲染日期
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            DateLabelFormat::Raw => date.format("%Y-%m-%d").to_string(),
            DateLabelFormat::HumanReadable => date.format("%d %B %Y").to_string(),
        }
    }
}

impl FromStr for DateLabelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" | "iso" => Ok(DateLabelFormat::Raw),
            "human_readable" | "human-readable" | "human" => Ok(DateLabelFormat::HumanReadable),
            _ => Err(format!("Unknown DateLabelFormat: {}", s)),
        }
    }
}

impl std::fmt::Display for DateLabelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateLabelFormat::Raw => write!(f, "raw"),
            DateLabelFormat::HumanReadable => write!(f, "human_readable"),
        }
    }
}
