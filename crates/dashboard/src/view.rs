use crate::chart::LineChartSpec;
use crate::selection::PriceRange;
use kabuka_core::common::DateLabelFormat;
use kabuka_core::common::segment::MarketSegment;
use kabuka_core::table::tidy::TidySeries;
use kabuka_core::table::{PriceRow, PriceTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one company.";
pub const NO_DATA_MESSAGE: &str = "No price data is available for this segment.";

/// 供前端直接展示的价格表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TableView {
    #[schema(example = "Stock prices (USD)")]
    pub caption: String,
    // 已按日期格式渲染的列标签
    pub columns: Vec<String>,
    pub rows: Vec<PriceRow>,
}

impl TableView {
    pub fn new(caption: impl Into<String>, table: &PriceTable, format: DateLabelFormat) -> Self {
        Self {
            caption: caption.into(),
            columns: table.column_labels(format),
            rows: table.rows().to_vec(),
        }
    }
}

/// # Summary
/// 分区视图的主体，三种状态互斥。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentBody {
    // 正常渲染：表格、长表与图表
    Chart {
        table: TableView,
        tidy: TidySeries,
        chart: LineChartSpec,
        // 落在价格区间之外、被图表裁剪的点数
        clipped_points: usize,
    },
    // 用户清空了选择，只显示提示
    EmptySelection { message: String },
    // 行情源没有任何数据
    NoData { message: String },
}

/// # Summary
/// 单个市场分区的完整视图。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SegmentView {
    #[schema(example = "us")]
    pub segment_id: String,
    #[schema(example = "US major stocks over the past 180 days")]
    pub heading: String,
    #[schema(example = "USD")]
    pub unit: String,
    pub lookback_days: u32,
    // 多选框选项 (价格表中实际存在的行)
    pub options: Vec<String>,
    // 实际生效的选择
    pub selected: Vec<String>,
    pub price_range: PriceRange,
    pub body: SegmentBody,
}

impl SegmentView {
    pub fn chart(&self) -> Option<&LineChartSpec> {
        match &self.body {
            SegmentBody::Chart { chart, .. } => Some(chart),
            _ => None,
        }
    }
}

/// 单次渲染的全部输入
#[derive(Debug, Clone, Copy)]
pub struct SegmentInput<'a> {
    pub segment: &'a MarketSegment,
    pub lookback_days: u32,
    pub table: &'a PriceTable,
    // None 表示使用默认选中项
    pub selection: Option<&'a [String]>,
    pub price_range: PriceRange,
    pub date_format: DateLabelFormat,
}

/// # Summary
/// 渲染一个分区：纯函数，同样的输入总是得到同样的视图。
///
/// # Logic
/// 1. 选项为价格表中存在的行；未指定选择时取代码集合的前四项。
///    无论哪种选择，都只保留表中存在的名称。
/// 2. 价格表为空时返回 NoData；有效选择为空时返回 EmptySelection，不生成图表。
/// 3. 否则按选择切片并按名称排序，转换为长表，再生成定义域固定的折线图。
///
/// # Returns
/// 分区视图。
pub fn render_segment(input: SegmentInput<'_>) -> SegmentView {
    let SegmentInput {
        segment,
        lookback_days,
        table,
        selection,
        price_range,
        date_format,
    } = input;

    let options: Vec<String> = table.row_names().into_iter().map(String::from).collect();
    // 只保留价格表中存在的行，选项之外的名称不会进入 selected
    let selected: Vec<String> = match selection {
        Some(names) => dedup(names),
        None => segment.tickers.default_selection(),
    }
    .into_iter()
    .filter(|name| table.contains(name))
    .collect();

    let body = if table.is_empty() {
        SegmentBody::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    } else if selected.is_empty() {
        SegmentBody::EmptySelection {
            message: EMPTY_SELECTION_MESSAGE.to_string(),
        }
    } else {
        let sliced = table.select(&selected);
        let tidy = sliced.to_tidy(segment.value_label());
        let clipped_points = tidy
            .rows
            .iter()
            .filter(|r| !price_range.contains(r.price))
            .count();
        let chart = LineChartSpec::from_tidy(&tidy, price_range);
        SegmentBody::Chart {
            table: TableView::new(format!("Stock prices ({})", segment.unit), &sliced, date_format),
            tidy,
            chart,
            clipped_points,
        }
    };

    SegmentView {
        segment_id: segment.id.clone(),
        heading: format!("{} over the past {} days", segment.title, lookback_days),
        unit: segment.unit.clone(),
        lookback_days,
        options,
        selected,
        price_range,
        body,
    }
}

/// 去重并保持首次出现顺序
fn dedup(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kabuka_core::common::TickerSet;
    use kabuka_core::common::segment::PriceBounds;
    use std::collections::BTreeMap;

    fn segment() -> MarketSegment {
        MarketSegment {
            id: "test".to_string(),
            title: "Test".to_string(),
            unit: "USD".to_string(),
            tickers: TickerSet::from_pairs([("B", "BBB"), ("A", "AAA"), ("C", "CCC")]),
            price_bounds: PriceBounds::new(0.0, 100.0),
            enabled: true,
        }
    }

    fn table() -> PriceTable {
        let dates: Vec<NaiveDate> = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap())
            .collect();
        let mut table = PriceTable::new();
        for (name, prices) in [("A", [10.0, 20.0, 30.0]), ("B", [15.0, 25.0, 35.0])] {
            let series: BTreeMap<NaiveDate, f64> =
                dates.iter().copied().zip(prices.iter().copied()).collect();
            table.append_row(name, &series);
        }
        table
    }

    fn input<'a>(
        segment: &'a MarketSegment,
        table: &'a PriceTable,
        selection: Option<&'a [String]>,
    ) -> SegmentInput<'a> {
        SegmentInput {
            segment,
            lookback_days: 3,
            table,
            selection,
            price_range: PriceRange::new(0.0, 100.0).unwrap(),
            date_format: DateLabelFormat::Raw,
        }
    }

    #[test]
    fn test_default_selection_skips_missing_rows() {
        let (segment, table) = (segment(), table());
        let view = render_segment(input(&segment, &table, None));
        // C 没有数据，不能作为默认选中项
        assert_eq!(view.selected, vec!["B", "A"]);
        assert_eq!(view.options, vec!["A", "B"]);
        assert_eq!(view.heading, "Test over the past 3 days");
    }

    #[test]
    fn test_selected_rows_are_sorted() {
        let (segment, table) = (segment(), table());
        let names = vec!["B".to_string(), "A".to_string(), "B".to_string()];
        let view = render_segment(input(&segment, &table, Some(names.as_slice())));

        assert_eq!(view.selected, vec!["B", "A"]);
        let SegmentBody::Chart { table: shown, tidy, .. } = &view.body else {
            panic!("expected chart body");
        };
        let shown_names: Vec<&str> = shown.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(shown_names, vec!["A", "B"]);
        assert_eq!(shown.columns, vec!["2026-10-01", "2026-10-02", "2026-10-03"]);
        assert_eq!(shown.caption, "Stock prices (USD)");
        assert_eq!(tidy.len(), 6);
    }

    #[test]
    fn test_empty_selection_has_no_chart() {
        let (segment, table) = (segment(), table());
        let view = render_segment(input(&segment, &table, Some(&[])));

        assert!(view.chart().is_none());
        assert_eq!(
            view.body,
            SegmentBody::EmptySelection {
                message: EMPTY_SELECTION_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_selection_without_rows_is_empty() {
        let (segment, table) = (segment(), table());
        // C 属于代码集合但没有数据
        let names = vec!["C".to_string()];
        let view = render_segment(input(&segment, &table, Some(names.as_slice())));

        assert!(view.selected.is_empty());
        assert!(matches!(view.body, SegmentBody::EmptySelection { .. }));

        let names = vec!["C".to_string(), "A".to_string()];
        let view = render_segment(input(&segment, &table, Some(names.as_slice())));
        assert_eq!(view.selected, vec!["A"]);
        assert!(view.selected.iter().all(|n| view.options.contains(n)));
    }

    #[test]
    fn test_empty_table_reports_no_data() {
        let segment = segment();
        let view = render_segment(input(&segment, &PriceTable::new(), None));
        assert!(matches!(view.body, SegmentBody::NoData { .. }));
        assert!(view.options.is_empty());
    }

    #[test]
    fn test_clipped_points_counted() {
        let (segment, table) = (segment(), table());
        let names = vec!["A".to_string(), "B".to_string()];
        let mut inp = input(&segment, &table, Some(names.as_slice()));
        inp.price_range = PriceRange::new(12.0, 30.0).unwrap();
        let view = render_segment(inp);

        let SegmentBody::Chart { clipped_points, chart, .. } = &view.body else {
            panic!("expected chart body");
        };
        // 10 与 35 落在区间之外
        assert_eq!(*clipped_points, 2);
        assert_eq!(chart.y_domain(), [12.0, 30.0]);
    }
}
