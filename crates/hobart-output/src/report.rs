//! Report Assembler
//!
//! Composes the regression table, distribution results and charts into an
//! ordered list of [`Section`]s, rendered as one self-contained HTML
//! document or as JSON. Nothing is defaulted: every regression slot, the
//! distribution analysis and both charts must be present.

use crate::chart::{ChartRenderer, RenderedChart};
use crate::narrative::{self, Narrative, Walkthrough};
use crate::summary::SummaryTable;
use crate::table::{LEGEND, RegressionTable, escape_html};
use chrono::{DateTime, NaiveDate, Utc};
use hobart_data::ReturnSeries;
use hobart_stats::{
    DescriptiveStats, DistributionAnalysis, NormalFit, RegressionResult, RegressionSet, StatsError,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

/// Attribution printed in the footer.
pub const DATA_SOURCE: &str = "Yahoo Finance";

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required input was not supplied.
    #[error("Incomplete report input: missing {missing}")]
    IncompleteInput {
        /// What is missing
        missing: String,
    },

    /// Two inputs disagree with each other.
    #[error("Inconsistent report input: {0}")]
    InconsistentInput(String),

    /// A chart could not be drawn.
    #[error("Chart error: {0}")]
    Chart(String),

    /// Statistics needed by a chart could not be computed.
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    fn missing(what: impl Into<String>) -> Self {
        Self::IncompleteInput {
            missing: what.into(),
        }
    }
}

/// Who and what a report is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Target ticker
    pub ticker: String,
    /// Display name, e.g. `MASCO (MAS)`
    pub stock_name: String,
    /// Requested start date
    pub start: NaiveDate,
    /// Requested end date
    pub end: NaiveDate,
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl ReportMetadata {
    /// Metadata stamped with the current time.
    pub fn new(
        ticker: impl Into<String>,
        stock_name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            stock_name: stock_name.into(),
            start,
            end,
            generated_at: Utc::now(),
        }
    }

    /// Override the generation timestamp.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Stock name with the ticker appended unless it already carries it.
    pub fn display_name(&self) -> String {
        if self.stock_name.contains(&format!("({})", self.ticker)) {
            self.stock_name.clone()
        } else {
            format!("{} ({})", self.stock_name, self.ticker)
        }
    }
}

/// One block of the report, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// Document title
    Title {
        /// Main title
        title: String,
        /// Analysis period line
        subtitle: String,
    },
    /// Free-standing narrative
    Narrative(Narrative),
    /// The regression table with its legend and reading guide
    RegressionTable {
        /// Heading
        heading: String,
        /// Formatted table
        table: RegressionTable,
        /// Standard-error note
        note: String,
        /// Significance legend
        legend: String,
        /// How to read the table
        guide: Narrative,
    },
    /// Whole-series summary statistics
    SummaryStatistics {
        /// Heading
        heading: String,
        /// One column per instrument
        table: SummaryTable,
    },
    /// Spreadsheet instructions
    Walkthrough(Walkthrough),
    /// Forced page break
    PageBreak,
    /// Histogram with fitted normal curve
    NormalDistribution {
        /// Heading
        heading: String,
        /// One-line description
        description: String,
        /// Rendered chart
        chart: RenderedChart,
        /// Fitted parameters
        fit: NormalFit,
    },
    /// Target vs reference CDF
    CdfComparison {
        /// Heading
        heading: String,
        /// One-line description
        description: String,
        /// Rendered chart
        chart: RenderedChart,
        /// Target label
        target_label: String,
        /// Target statistics
        target: DescriptiveStats,
        /// Reference label
        reference_label: String,
        /// Reference statistics
        reference: DescriptiveStats,
    },
    /// Timestamp and data attribution
    Footer {
        /// Generation timestamp
        generated_at: DateTime<Utc>,
        /// Data source
        source: String,
    },
}

impl Section {
    /// Stable name of the section kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::Narrative(_) => "narrative",
            Self::RegressionTable { .. } => "regression_table",
            Self::SummaryStatistics { .. } => "summary_statistics",
            Self::Walkthrough(_) => "walkthrough",
            Self::PageBreak => "page_break",
            Self::NormalDistribution { .. } => "normal_distribution",
            Self::CdfComparison { .. } => "cdf_comparison",
            Self::Footer { .. } => "footer",
        }
    }
}

/// A finished report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Subject and timestamp
    pub metadata: ReportMetadata,
    /// The five fitted models
    pub regressions: Vec<RegressionResult>,
    /// Sections in display order
    pub sections: Vec<Section>,
}

impl Report {
    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Charts embedded in the report, keyed by section kind.
    pub fn charts(&self) -> Vec<(&'static str, &RenderedChart)> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::NormalDistribution { chart, .. } | Section::CdfComparison { chart, .. } => {
                    Some((section.kind(), chart))
                }
                _ => None,
            })
            .collect()
    }

    /// Self-contained, print-paginated HTML document.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
            escape_html(&format!("{} Stock Returns Analysis", self.metadata.display_name())),
            STYLE
        );
        for section in &self.sections {
            render_section(&mut html, section);
        }
        html.push_str("</body>\n</html>\n");
        html
    }

    /// Write the HTML document to `path`.
    pub fn save_html(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_html())?;
        Ok(())
    }
}

const STYLE: &str = "\
@page{size:letter;margin:0.75in}\
body{font-family:Helvetica,Arial,sans-serif;color:#222;max-width:7in;margin:0 auto}\
h1{text-align:center;font-size:22px;margin-bottom:4px}\
.subtitle{text-align:center;color:#555;margin-top:0}\
h2{font-size:16px;margin-top:24px}\
h3{font-size:13px;color:#1f77b4}\
table{border-collapse:collapse;margin:8px 0;font-size:11px}\
th,td{border:1px solid #bbb;padding:4px 6px;text-align:center}\
thead th{background:#f0f0f0}\
.legend,.note{font-size:11px}\
.chart{width:100%;height:auto}\
.params td{text-align:left}\
.page-break{break-after:page;page-break-after:always}\
footer{margin-top:36px;text-align:center;font-size:9px;color:#666}\
";

fn render_narrative(html: &mut String, narrative: &Narrative, level: &str) {
    let _ = writeln!(html, "<{level}>{}</{level}>", escape_html(&narrative.heading));
    for p in &narrative.paragraphs {
        let _ = writeln!(html, "<p>{}</p>", escape_html(p));
    }
}

fn render_stats_row(html: &mut String, label: &str, stats: &DescriptiveStats) {
    let _ = writeln!(
        html,
        "<tr><th>{}</th><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td></tr>",
        escape_html(label),
        stats.mean,
        stats.std,
        stats.min,
        stats.max
    );
}

fn render_section(html: &mut String, section: &Section) {
    match section {
        Section::Title { title, subtitle } => {
            let _ = writeln!(html, "<h1>{}</h1>", escape_html(title));
            let _ = writeln!(html, "<p class=\"subtitle\">{}</p>", escape_html(subtitle));
        }
        Section::Narrative(narrative) => render_narrative(html, narrative, "h3"),
        Section::RegressionTable {
            heading,
            table,
            note,
            legend,
            guide,
        } => {
            let _ = writeln!(html, "<section class=\"regressions\">\n<h2>{}</h2>", escape_html(heading));
            html.push_str(&table.to_html());
            let _ = writeln!(html, "\n<p class=\"note\">{}</p>", escape_html(note));
            let _ = writeln!(html, "<p class=\"legend\">{}</p>", escape_html(legend));
            render_narrative(html, guide, "h3");
            html.push_str("</section>\n");
        }
        Section::SummaryStatistics { heading, table } => {
            let _ = writeln!(html, "<h2>{}</h2>", escape_html(heading));
            html.push_str(&table.to_html());
            html.push('\n');
        }
        Section::Walkthrough(walkthrough) => {
            let _ = writeln!(html, "<h3>{}</h3>", escape_html(&walkthrough.heading));
            for step in &walkthrough.steps {
                let _ = writeln!(html, "<p><strong>{}</strong></p>\n<ul>", escape_html(&step.title));
                for item in &step.items {
                    let _ = writeln!(html, "<li>{}</li>", escape_html(item));
                }
                html.push_str("</ul>\n");
            }
        }
        Section::PageBreak => html.push_str("<div class=\"page-break\"></div>\n"),
        Section::NormalDistribution {
            heading,
            description,
            chart,
            fit,
        } => {
            let _ = writeln!(html, "<section class=\"normal-distribution\">\n<h2>{}</h2>", escape_html(heading));
            let _ = writeln!(html, "<p>{}</p>", escape_html(description));
            let _ = writeln!(html, "<img class=\"chart\" alt=\"{}\" src=\"{}\">", escape_html(heading), chart.to_data_uri());
            let _ = writeln!(
                html,
                "<table class=\"params\"><tr><th>Mean (μ)</th><td>{:.4}</td></tr><tr><th>Standard Deviation (σ)</th><td>{:.4}</td></tr><tr><th>Variance (σ²)</th><td>{:.4}</td></tr></table>",
                fit.mu,
                fit.sigma,
                fit.variance()
            );
            html.push_str("</section>\n");
        }
        Section::CdfComparison {
            heading,
            description,
            chart,
            target_label,
            target,
            reference_label,
            reference,
        } => {
            let _ = writeln!(html, "<section class=\"cdf\">\n<h2>{}</h2>", escape_html(heading));
            let _ = writeln!(html, "<p>{}</p>", escape_html(description));
            let _ = writeln!(html, "<img class=\"chart\" alt=\"{}\" src=\"{}\">", escape_html(heading), chart.to_data_uri());
            html.push_str("<table class=\"comparison\">\n<thead><tr><th></th><th>Mean</th><th>Std Dev</th><th>Min</th><th>Max</th></tr></thead>\n");
            render_stats_row(html, target_label, target);
            render_stats_row(html, reference_label, reference);
            html.push_str("</table>\n</section>\n");
        }
        Section::Footer {
            generated_at,
            source,
        } => {
            let _ = writeln!(
                html,
                "<footer>Generated: {} | Data Source: {}</footer>",
                generated_at.format("%Y-%m-%d %H:%M:%S"),
                escape_html(source)
            );
        }
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    metadata: Option<ReportMetadata>,
    regressions: Option<RegressionSet>,
    table: Option<RegressionTable>,
    distribution: Option<DistributionAnalysis>,
    normal_chart: Option<RenderedChart>,
    cdf_chart: Option<RenderedChart>,
    summary: Option<SummaryTable>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subject metadata.
    pub fn metadata(mut self, metadata: ReportMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the regression outcomes.
    pub fn regressions(mut self, regressions: RegressionSet) -> Self {
        self.regressions = Some(regressions);
        self
    }

    /// Set the formatted regression table. It must be the formatting of
    /// the regression outcomes given to [`ReportBuilder::regressions`].
    pub fn table(mut self, table: RegressionTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Set the distribution analysis.
    pub fn distribution(mut self, distribution: DistributionAnalysis) -> Self {
        self.distribution = Some(distribution);
        self
    }

    /// Set the normal-fit chart.
    pub fn normal_chart(mut self, chart: RenderedChart) -> Self {
        self.normal_chart = Some(chart);
        self
    }

    /// Set the CDF comparison chart.
    pub fn cdf_chart(mut self, chart: RenderedChart) -> Self {
        self.cdf_chart = Some(chart);
        self
    }

    /// Set the optional summary statistics table.
    pub fn summary(mut self, summary: SummaryTable) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Build the report.
    ///
    /// # Errors
    ///
    /// [`ReportError::IncompleteInput`] naming the first missing piece, or
    /// [`ReportError::InconsistentInput`] when the table was not formatted
    /// from the regression outcomes.
    pub fn build(self) -> Result<Report, ReportError> {
        let meta = self.metadata.ok_or_else(|| ReportError::missing("report metadata"))?;
        let set = self.regressions.ok_or_else(|| ReportError::missing("regression results"))?;
        if let Some((model, _)) = set.failures().next() {
            return Err(ReportError::missing(format!("regression model {model}")));
        }
        let regressions: Vec<RegressionResult> = set.successful().cloned().collect();
        let table = self.table.ok_or_else(|| ReportError::missing("regression table"))?;
        if table != RegressionTable::format(&set) {
            return Err(ReportError::InconsistentInput(
                "regression table does not match the regression results".to_string(),
            ));
        }
        let distribution = self
            .distribution
            .ok_or_else(|| ReportError::missing("distribution fit"))?;
        if distribution.target_cdf.is_empty() || distribution.reference_cdf.is_empty() {
            return Err(ReportError::missing("CDF data"));
        }
        let normal_chart = self
            .normal_chart
            .ok_or_else(|| ReportError::missing("normal distribution chart"))?;
        let cdf_chart = self.cdf_chart.ok_or_else(|| ReportError::missing("CDF chart"))?;

        let name = meta.display_name();
        let reference_label = distribution.reference.display_name().to_string();

        let mut sections = vec![
            Section::Title {
                title: format!("{name} Stock Returns Analysis"),
                subtitle: format!("Analysis Period: {} to {}", meta.start, meta.end),
            },
            Section::Narrative(narrative::introduction(&meta)),
            Section::RegressionTable {
                heading: format!("{name} Monthly Return Regressions"),
                table,
                note: "Standard errors in parentheses".to_string(),
                legend: LEGEND.to_string(),
                guide: narrative::table_guide(&meta),
            },
        ];
        if let Some(table) = self.summary {
            sections.push(Section::SummaryStatistics {
                heading: "Summary Statistics".to_string(),
                table,
            });
        }
        sections.extend([
            Section::Walkthrough(narrative::regression_walkthrough(&meta)),
            Section::PageBreak,
            Section::NormalDistribution {
                heading: "Normal Distribution Fit".to_string(),
                description: format!(
                    "Histogram of {} monthly returns with fitted normal distribution curve.",
                    meta.ticker
                ),
                chart: normal_chart,
                fit: distribution.normal,
            },
            Section::Walkthrough(narrative::normal_walkthrough(&meta)),
            Section::PageBreak,
            Section::CdfComparison {
                heading: "Cumulative Distribution Function (CDF)".to_string(),
                description: format!(
                    "Comparison of cumulative distribution of monthly returns: {} vs {reference_label}",
                    meta.ticker
                ),
                chart: cdf_chart,
                target_label: meta.ticker.clone(),
                target: distribution.target_stats,
                reference_label,
                reference: distribution.reference_stats,
            },
            Section::Walkthrough(narrative::cdf_walkthrough(&meta)),
            Section::Footer {
                generated_at: meta.generated_at,
                source: DATA_SOURCE.to_string(),
            },
        ]);

        tracing::debug!(ticker = %meta.ticker, sections = sections.len(), "assembled report");

        Ok(Report {
            metadata: meta,
            regressions,
            sections,
        })
    }
}

/// Render both charts and assemble the report.
///
/// `distribution` is `None` when the distribution analysis failed; the
/// report then fails with [`ReportError::IncompleteInput`]. A chart the
/// renderer cannot draw is likewise reported as missing.
///
/// # Errors
///
/// [`ReportError::IncompleteInput`] naming the first missing piece.
pub fn assemble<R: ChartRenderer>(
    renderer: &R,
    series: &ReturnSeries,
    regressions: &RegressionSet,
    table: &RegressionTable,
    distribution: Option<&DistributionAnalysis>,
    metadata: ReportMetadata,
) -> Result<Report, ReportError> {
    let mut builder = ReportBuilder::new()
        .metadata(metadata)
        .regressions(regressions.clone())
        .table(table.clone());

    match SummaryTable::from_series(series) {
        Ok(summary) => builder = builder.summary(summary),
        Err(err) => tracing::warn!(error = %err, "summary statistics unavailable"),
    }

    if let Some(analysis) = distribution {
        match renderer.normal_fit(series.target(), &series.target_returns(), &analysis.normal) {
            Ok(output) => builder = builder.normal_chart(output.image),
            Err(err) => tracing::warn!(error = %err, "normal distribution chart failed"),
        }
        match renderer.cdf_comparison(
            series.target(),
            &analysis.target_cdf,
            analysis.reference.display_name(),
            &analysis.reference_cdf,
        ) {
            Ok(output) => builder = builder.cdf_chart(output.image),
            Err(err) => tracing::warn!(error = %err, "CDF chart failed"),
        }
        builder = builder.distribution(analysis.clone());
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::SvgChartRenderer;
    use hobart_data::ReturnObservation;
    use hobart_stats::{analyze_distribution, fit_all};

    fn series() -> ReturnSeries {
        let observations = (0..36u32)
            .map(|i| {
                let date = hobart_data::month_end(
                    NaiveDate::from_ymd_opt(2020 + (i / 12) as i32, i % 12 + 1, 1).unwrap(),
                );
                let x = f64::from(i);
                let sp = (x * 0.9).sin() * 0.04;
                let vw = (x * 1.7).cos() * 0.03;
                let tyx = (x * 0.4).sin() * 0.05;
                ReturnObservation::new(date, 1.1 * sp + (x * 2.3).sin() * 0.02, [sp, vw, tyx])
            })
            .collect();
        ReturnSeries::new("MAS", observations).unwrap()
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata::new(
            "MAS",
            "MASCO (MAS)",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
        )
    }

    fn report() -> Report {
        let series = series();
        let set = fit_all(&series);
        let table = RegressionTable::format(&set);
        let analysis = analyze_distribution(&series).unwrap();
        assemble(
            &SvgChartRenderer::new(),
            &series,
            &set,
            &table,
            Some(&analysis),
            metadata(),
        )
        .unwrap()
    }

    #[test]
    fn test_section_order() {
        let report = report();
        let kinds: Vec<_> = report.sections.iter().map(Section::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "title",
                "narrative",
                "regression_table",
                "summary_statistics",
                "walkthrough",
                "page_break",
                "normal_distribution",
                "walkthrough",
                "page_break",
                "cdf_comparison",
                "walkthrough",
                "footer",
            ]
        );
        assert_eq!(report.regressions.len(), 5);
        assert_eq!(report.charts().len(), 2);
    }

    #[test]
    fn test_html_sections_in_order() {
        let report = report();
        let html = report.to_html();
        let legend = escape_html(LEGEND);

        let positions: Vec<usize> = [
            "<h1>MASCO (MAS) Stock Returns Analysis</h1>",
            "Why This Analysis Matters",
            "<table class=\"regression-table\">",
            legend.as_str(),
            "class=\"page-break\"",
            "Normal Distribution Fit",
            "Cumulative Distribution Function (CDF)",
            "Data Source: Yahoo Finance",
        ]
        .iter()
        .map(|needle| html.find(*needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");

        assert_eq!(html.matches("class=\"page-break\"").count(), 2);
        assert_eq!(html.matches("data:image/svg+xml;base64,").count(), 2);
        assert!(html.contains("Analysis Period: 2020-01-01 to 2022-12-31"));
    }

    #[test]
    fn test_table_embedded_verbatim() {
        let series = series();
        let table = RegressionTable::format(&fit_all(&series));
        let html = report().to_html();
        assert!(html.contains(&table.to_html()));
    }

    #[test]
    fn test_json_export() {
        let report = report();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"kind\": \"regression_table\""));
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sections.len(), report.sections.len());
        assert_eq!(back.metadata, report.metadata);
    }

    #[test]
    fn test_missing_distribution_is_incomplete() {
        let series = series();
        let set = fit_all(&series);
        let table = RegressionTable::format(&set);
        let err = assemble(&SvgChartRenderer::new(), &series, &set, &table, None, metadata())
            .unwrap_err();
        assert!(
            matches!(err, ReportError::IncompleteInput { ref missing } if missing == "distribution fit")
        );
    }

    #[test]
    fn test_builder_reports_missing_pieces() {
        let err = ReportBuilder::new().build().unwrap_err();
        assert!(matches!(err, ReportError::IncompleteInput { ref missing } if missing == "report metadata"));

        let series = series();
        let set = fit_all(&series);
        let err = ReportBuilder::new()
            .metadata(metadata())
            .regressions(set.clone())
            .table(RegressionTable::format(&set))
            .distribution(analyze_distribution(&series).unwrap())
            .build()
            .unwrap_err();
        assert!(
            matches!(err, ReportError::IncompleteInput { ref missing } if missing == "normal distribution chart")
        );
    }

    #[test]
    fn test_builder_rejects_mismatched_table() {
        let series = series();
        let set = fit_all(&series);
        let results: Vec<_> = set.successful().take(3).cloned().collect();
        let renderer = SvgChartRenderer::new();
        let analysis = analyze_distribution(&series).unwrap();
        let normal = renderer
            .normal_fit("MAS", &series.target_returns(), &analysis.normal)
            .unwrap()
            .image;
        let cdf = renderer
            .cdf_comparison(
                "MAS",
                &analysis.target_cdf,
                analysis.reference.display_name(),
                &analysis.reference_cdf,
            )
            .unwrap()
            .image;

        let builder = || {
            ReportBuilder::new()
                .metadata(metadata())
                .regressions(set.clone())
                .distribution(analysis.clone())
                .normal_chart(normal.clone())
                .cdf_chart(cdf.clone())
        };

        let err = builder()
            .table(RegressionTable::from_results(&results))
            .build()
            .unwrap_err();
        assert!(matches!(err, ReportError::InconsistentInput(_)));

        let report = builder().table(RegressionTable::format(&set)).build().unwrap();
        assert_eq!(report.regressions.len(), 5);
    }

    #[test]
    fn test_failed_model_is_incomplete() {
        // VW duplicates SP500, so models 4 and 5 are singular
        let observations = (0..24u32)
            .map(|i| {
                let date = hobart_data::month_end(
                    NaiveDate::from_ymd_opt(2020 + (i / 12) as i32, i % 12 + 1, 1).unwrap(),
                );
                let sp = (f64::from(i) * 0.9).sin() * 0.04;
                ReturnObservation::new(date, sp + 0.001 * f64::from(i % 3), [sp, sp, 0.01 * f64::from(i % 5)])
            })
            .collect();
        let series = ReturnSeries::new("MAS", observations).unwrap();
        let set = fit_all(&series);
        let table = RegressionTable::format(&set);
        let analysis = analyze_distribution(&series).unwrap();

        assert_eq!(table.rows()[3].fit, "n/a");
        let err = assemble(
            &SvgChartRenderer::new(),
            &series,
            &set,
            &table,
            Some(&analysis),
            metadata(),
        )
        .unwrap_err();
        assert!(
            matches!(err, ReportError::IncompleteInput { ref missing } if missing == "regression model (4)")
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(metadata().display_name(), "MASCO (MAS)");
        let plain = ReportMetadata::new(
            "PCG",
            "PCG Corp",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        );
        assert_eq!(plain.display_name(), "PCG Corp (PCG)");
    }
}
