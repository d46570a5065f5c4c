#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;
pub mod narrative;
pub mod report;
pub mod summary;
pub mod table;

pub use chart::{CdfChartData, ChartOutput, ChartRenderer, NormalChartData, RenderedChart, SvgChartRenderer};
pub use export::{
    ExportError, ExportFormat, Exporter, RegressionSummaryExport, RegressionSummaryRow,
    ReturnsExport, ReturnsRow, export_file_name, safe_stock_name,
};
pub use narrative::{Narrative, Walkthrough, WalkthroughStep};
pub use report::{DATA_SOURCE, Report, ReportBuilder, ReportError, ReportMetadata, Section, assemble};
pub use summary::{ColumnSummary, STAT_LABELS, SummaryTable};
pub use table::{
    FormattedRegressionRow, HEADERS, LEGEND, RegressionTable, Significance, UNAVAILABLE,
    format_cell, significance_stars,
};
