//! Flat data exports.
//!
//! CSV and JSON renditions of the monthly return table and the per-model
//! regression summary, plus the file naming scheme shared by every artifact
//! of one run.

use chrono::NaiveDate;
use hobart_data::ReturnSeries;
use hobart_factors::Factor;
use hobart_stats::{RegressionResult, RegressionSet};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writer produced invalid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// One month of the return table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnsRow {
    /// Month-end date
    pub date: NaiveDate,
    /// Target log return
    pub target: f64,
    /// S&P 500 log return
    pub sp500: f64,
    /// Value-weighted market log return
    pub vw: f64,
    /// 30-year Treasury yield log change
    pub tyx: f64,
}

/// The aligned monthly return table.
///
/// CSV header: `Date,<ticker>,SP500,VW,TYX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsExport {
    /// Target ticker, used as the CSV column name
    pub ticker: String,
    /// Rows in date order
    pub rows: Vec<ReturnsRow>,
}

impl ReturnsExport {
    /// Capture a return series.
    pub fn from_series(series: &ReturnSeries) -> Self {
        let rows = series
            .observations()
            .iter()
            .map(|obs| ReturnsRow {
                date: obs.date,
                target: obs.target,
                sp500: obs.factor(Factor::Sp500),
                vw: obs.factor(Factor::ValueWeighted),
                tyx: obs.factor(Factor::TreasuryYield),
            })
            .collect();

        Self {
            ticker: series.target().to_string(),
            rows,
        }
    }
}

impl Exporter for ReturnsExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record([
                    "Date",
                    self.ticker.as_str(),
                    Factor::Sp500.column(),
                    Factor::ValueWeighted.column(),
                    Factor::TreasuryYield.column(),
                ])?;
                for row in &self.rows {
                    wtr.write_record([
                        row.date.format("%Y-%m-%d").to_string(),
                        row.target.to_string(),
                        row.sp500.to_string(),
                        row.vw.to_string(),
                        row.tyx.to_string(),
                    ])?;
                }
                finish_csv(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Fit statistics of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummaryRow {
    /// Model label, `"(1)"` to `"(5)"`
    pub model: String,
    /// R²
    pub r_squared: f64,
    /// Adjusted R²
    pub adj_r_squared: f64,
    /// F-statistic
    pub f_statistic: f64,
    /// Observation count
    pub observations: usize,
}

impl From<&RegressionResult> for RegressionSummaryRow {
    fn from(result: &RegressionResult) -> Self {
        Self {
            model: result.model.to_string(),
            r_squared: result.r_squared,
            adj_r_squared: result.adj_r_squared,
            f_statistic: result.f_statistic,
            observations: result.nobs,
        }
    }
}

/// Per-model fit summary.
///
/// CSV header: `Model,R-squared,Adj R-squared,F-statistic,Observations`,
/// floats with four decimals. Models that failed to fit are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummaryExport {
    /// Rows in model order
    pub rows: Vec<RegressionSummaryRow>,
}

impl RegressionSummaryExport {
    /// CSV column names.
    pub const HEADER: [&'static str; 5] = [
        "Model",
        "R-squared",
        "Adj R-squared",
        "F-statistic",
        "Observations",
    ];

    /// Summarize the fitted models of a set.
    pub fn from_set(set: &RegressionSet) -> Self {
        Self {
            rows: set.successful().map(RegressionSummaryRow::from).collect(),
        }
    }
}

impl Exporter for RegressionSummaryExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(Self::HEADER)?;
                for row in &self.rows {
                    wtr.write_record([
                        row.model.clone(),
                        format!("{:.4}", row.r_squared),
                        format!("{:.4}", row.adj_r_squared),
                        format!("{:.4}", row.f_statistic),
                        row.observations.to_string(),
                    ])?;
                }
                finish_csv(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Stock display name made safe for file names: spaces and `/` become `_`,
/// parentheses are dropped.
pub fn safe_stock_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if matches!(c, ' ' | '/') { '_' } else { c })
        .collect()
}

/// `{ticker}_{safe_name}_{kind}_{YYYYMMDD}_to_{YYYYMMDD}.{ext}`
pub fn export_file_name(
    ticker: &str,
    stock_name: &str,
    kind: &str,
    start: NaiveDate,
    end: NaiveDate,
    extension: &str,
) -> String {
    format!(
        "{ticker}_{}_{kind}_{}_to_{}.{extension}",
        safe_stock_name(stock_name),
        start.format("%Y%m%d"),
        end.format("%Y%m%d"),
    )
}
