//! End-to-end analysis pipeline.
//!
//! Builder → {Regression Engine → Table Formatter, Distribution Analyzer}
//! → Report Assembler. Only a failure to build the return series aborts the
//! run; a failed model, distribution or report leaves the rest intact.

use crate::error::Result;
use chrono::NaiveDate;
use hobart_data::{PriceSource, ReturnSeries};
use hobart_output::{
    ChartRenderer, ExportFormat, Exporter, RegressionSummaryExport, RegressionTable, Report,
    ReportError, ReportMetadata, ReturnsExport, Section, SummaryTable, assemble, export_file_name,
};
use hobart_stats::{DistributionAnalysis, RegressionSet, analyze_distribution, fit_all};
use std::path::{Path, PathBuf};

/// Default analysis start date.
pub const DEFAULT_START: &str = "2005-01-01";

/// Default analysis end date.
pub const DEFAULT_END: &str = "2025-01-30";

/// What to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Target ticker
    pub ticker: String,
    /// Display name
    pub stock_name: String,
    /// Inclusive start date
    pub start: NaiveDate,
    /// Inclusive end date
    pub end: NaiveDate,
}

impl AnalysisRequest {
    /// Create a new request.
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
        }
    }

    /// Report metadata stamped now.
    pub fn metadata(&self) -> ReportMetadata {
        ReportMetadata::new(&self.ticker, &self.stock_name, self.start, self.end)
    }

    /// Output file name for an artifact of this request.
    pub fn file_name(&self, kind: &str, extension: &str) -> String {
        export_file_name(
            &self.ticker,
            &self.stock_name,
            kind,
            self.start,
            self.end,
            extension,
        )
    }
}

/// Everything one run produced.
#[derive(Debug)]
pub struct Analysis {
    /// The request
    pub request: AnalysisRequest,
    /// Aligned monthly returns
    pub series: ReturnSeries,
    /// The five model outcomes
    pub regressions: RegressionSet,
    /// Formatted regression table
    pub table: RegressionTable,
    /// Whole-series summary statistics
    pub summary: Option<SummaryTable>,
    /// Gaussian fit and CDFs, if computable
    pub distribution: Option<DistributionAnalysis>,
    /// The assembled report, or why it could not be built
    pub report: std::result::Result<Report, ReportError>,
}

/// Paths written by [`Analysis::write_outputs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    /// Monthly returns CSV
    pub returns: PathBuf,
    /// Per-model fit summary CSV
    pub regression_summary: PathBuf,
    /// HTML report, when one was assembled
    pub report: Option<PathBuf>,
    /// Chart images
    pub charts: Vec<PathBuf>,
}

impl WrittenFiles {
    /// Every written path.
    pub fn all(&self) -> Vec<&Path> {
        let mut paths = vec![self.returns.as_path(), self.regression_summary.as_path()];
        paths.extend(self.report.as_deref());
        paths.extend(self.charts.iter().map(PathBuf::as_path));
        paths
    }
}

impl Analysis {
    /// Monthly return table for export.
    pub fn returns_export(&self) -> ReturnsExport {
        ReturnsExport::from_series(&self.series)
    }

    /// Per-model fit summary for export.
    pub fn regression_summary_export(&self) -> RegressionSummaryExport {
        RegressionSummaryExport::from_set(&self.regressions)
    }

    /// Write the CSV exports, and the report with its charts when present.
    pub fn write_outputs(&self, dir: &Path) -> Result<WrittenFiles> {
        std::fs::create_dir_all(dir)?;
        let request = &self.request;

        let returns = dir.join(request.file_name("returns", ExportFormat::Csv.extension()));
        self.returns_export().export_to_file(&returns, ExportFormat::Csv)?;

        let regression_summary =
            dir.join(request.file_name("regression_summary", ExportFormat::Csv.extension()));
        self.regression_summary_export()
            .export_to_file(&regression_summary, ExportFormat::Csv)?;

        let mut written = WrittenFiles {
            returns,
            regression_summary,
            ..Default::default()
        };

        if let Ok(report) = &self.report {
            let path = dir.join(request.file_name("report", "html"));
            report.save_html(&path)?;
            written.report = Some(path);

            for section in &report.sections {
                let (kind, chart) = match section {
                    Section::NormalDistribution { chart, .. } => ("normal_fit", chart),
                    Section::CdfComparison { chart, .. } => ("cdf", chart),
                    _ => continue,
                };
                let path = dir.join(request.file_name(kind, chart.extension()));
                std::fs::write(&path, &chart.bytes)?;
                written.charts.push(path);
            }
        }

        tracing::info!(files = written.all().len(), dir = %dir.display(), "wrote outputs");
        Ok(written)
    }
}

/// Run the whole pipeline for one request.
///
/// # Errors
///
/// Fails only when the return series cannot be built. Downstream failures
/// are recorded in the returned [`Analysis`].
pub async fn run_analysis<S, R>(
    source: &S,
    renderer: &R,
    request: AnalysisRequest,
) -> Result<Analysis>
where
    S: PriceSource,
    R: ChartRenderer,
{
    tracing::info!(
        ticker = %request.ticker,
        start = %request.start,
        end = %request.end,
        "starting analysis"
    );

    let series = hobart_data::build(source, &request.ticker, request.start, request.end).await?;
    tracing::info!(observations = series.len(), "return series ready");

    let regressions = fit_all(&series);
    let table = RegressionTable::format(&regressions);

    let summary = SummaryTable::from_series(&series)
        .inspect_err(|e| tracing::warn!(error = %e, "summary statistics unavailable"))
        .ok();
    let distribution = analyze_distribution(&series)
        .inspect_err(|e| tracing::warn!(error = %e, "distribution analysis failed"))
        .ok();

    let report = assemble(
        renderer,
        &series,
        &regressions,
        &table,
        distribution.as_ref(),
        request.metadata(),
    );
    match &report {
        Ok(report) => tracing::info!(sections = report.sections.len(), "report assembled"),
        Err(e) => tracing::warn!(error = %e, "report not assembled"),
    }

    Ok(Analysis {
        request,
        series,
        regressions,
        table,
        summary,
        distribution,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use chrono::{Datelike, Weekday};
    use hobart_data::{PricePoint, PriceTable, StaticPriceSource, required_symbols};
    use hobart_output::SvgChartRenderer;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Three years of noisy business-day prices. With `collinear`, the VW
    /// proxy replays the S&P 500 exactly.
    fn source(collinear: bool) -> StaticPriceSource {
        let mut rng = StdRng::seed_from_u64(42);
        let symbols = required_symbols("MAS");
        let mut histories: Vec<Vec<PricePoint>> = vec![Vec::new(); symbols.len()];
        let mut levels = [30.0, 3500.0, 35000.0, 2.5];

        let mut day = date(2021, 1, 4);
        while day <= date(2023, 12, 29) {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                let sp: f64 = rng.gen_range(-0.015..0.015);
                let vw = if collinear {
                    sp
                } else {
                    0.8 * sp + rng.gen_range(-0.005..0.005)
                };
                let tyx: f64 = rng.gen_range(-0.02..0.02);
                let target = 1.4 * sp + rng.gen_range(-0.003..0.003);
                for (level, r) in levels.iter_mut().zip([target, sp, vw, tyx]) {
                    *level *= r.exp();
                }
                if collinear {
                    levels[2] = levels[1];
                }
                for (history, level) in histories.iter_mut().zip(levels) {
                    history.push(PricePoint::new(day, level));
                }
            }
            day = day.succ_opt().unwrap();
        }

        let mut table = PriceTable::new();
        for (symbol, history) in symbols.into_iter().zip(histories) {
            table.insert(symbol, history);
        }
        StaticPriceSource::new(table)
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("MAS", "MASCO (MAS)", date(2021, 1, 1), date(2023, 12, 31))
    }

    fn out_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hobart_{name}_{}", std::process::id()))
    }

    #[tokio::test]
    async fn test_run_analysis() {
        let analysis = run_analysis(&source(false), &SvgChartRenderer::new(), request())
            .await
            .unwrap();

        assert_eq!(analysis.series.len(), 35);
        assert!(analysis.regressions.is_complete());
        assert!(analysis.distribution.is_some());
        assert!(analysis.summary.is_some());

        let report = analysis.report.as_ref().unwrap();
        assert_eq!(report.regressions.len(), 5);
        let beta = report.regressions[0]
            .coefficient(hobart_factors::Regressor::Factor(hobart_factors::Factor::Sp500))
            .unwrap();
        assert!((beta - 1.4).abs() < 0.15, "beta {beta}");
    }

    #[tokio::test]
    async fn test_write_outputs() {
        let analysis = run_analysis(&source(false), &SvgChartRenderer::new(), request())
            .await
            .unwrap();
        let dir = out_dir("outputs");

        let written = analysis.write_outputs(&dir).unwrap();
        assert_eq!(written.all().len(), 5);
        assert!(
            written
                .returns
                .ends_with("MAS_MASCO_MAS_returns_20210101_to_20231231.csv")
        );
        assert!(
            written
                .report
                .as_ref()
                .unwrap()
                .ends_with("MAS_MASCO_MAS_report_20210101_to_20231231.html")
        );
        for path in written.all() {
            assert!(path.exists(), "{}", path.display());
        }

        let summary = std::fs::read_to_string(&written.regression_summary).unwrap();
        assert_eq!(summary.lines().count(), 6);
        let svg = std::fs::read_to_string(&written.charts[0]).unwrap();
        assert!(svg.starts_with("<svg"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_singular_models_keep_exports() {
        let analysis = run_analysis(&source(true), &SvgChartRenderer::new(), request())
            .await
            .unwrap();

        assert_eq!(analysis.regressions.failures().count(), 2);
        assert!(matches!(
            analysis.report,
            Err(ReportError::IncompleteInput { .. })
        ));
        assert_eq!(analysis.table.rows()[4].fit, hobart_output::UNAVAILABLE);

        let dir = out_dir("singular");
        let written = analysis.write_outputs(&dir).unwrap();
        assert!(written.report.is_none());
        assert!(written.charts.is_empty());
        let summary = std::fs::read_to_string(&written.regression_summary).unwrap();
        assert_eq!(summary.lines().count(), 4);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_unknown_ticker_aborts() {
        let mut request = request();
        request.ticker = "ZZZZ".to_string();

        let err = run_analysis(&source(false), &SvgChartRenderer::new(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Data(ref e) if e.is_unavailable()));
    }
}
