//! Whole-series summary statistics.
//!
//! One [`DescriptiveStats`] per column of the return table, laid out with
//! statistics as rows and columns as instruments.

use crate::table::escape_html;
use hobart_data::ReturnSeries;
use hobart_factors::Factor;
use hobart_stats::{DescriptiveStats, StatsError, describe};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row labels, in display order.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name
    pub name: String,
    /// Its statistics
    pub stats: DescriptiveStats,
}

impl ColumnSummary {
    fn values(&self) -> [f64; 8] {
        let s = &self.stats;
        [
            s.count as f64,
            s.mean,
            s.std,
            s.min,
            s.q25,
            s.median,
            s.q75,
            s.max,
        ]
    }
}

/// Summary statistics of the target and every factor column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Target first, then SP500, VW, TYX
    pub columns: Vec<ColumnSummary>,
}

impl SummaryTable {
    /// Describe every column of a return series.
    ///
    /// # Errors
    ///
    /// [`StatsError::EmptySeries`] if the series has no rows.
    pub fn from_series(series: &ReturnSeries) -> Result<Self, StatsError> {
        let mut columns = vec![ColumnSummary {
            name: series.target().to_string(),
            stats: describe(series.target(), &series.target_returns())?,
        }];
        for factor in Factor::ALL {
            columns.push(ColumnSummary {
                name: factor.column().to_string(),
                stats: describe(factor.column(), &series.factor_returns(factor))?,
            });
        }
        Ok(Self { columns })
    }

    /// Statistics of a column by name.
    pub fn column(&self, name: &str) -> Option<&DescriptiveStats> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.stats)
    }

    fn cell(label: &str, value: f64) -> String {
        if label == "count" {
            format!("{value:.0}")
        } else {
            format!("{value:.6}")
        }
    }

    /// HTML `<table>` element.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<table class=\"summary-table\">\n<thead><tr><th></th>");
        for column in &self.columns {
            out.push_str(&format!("<th>{}</th>", escape_html(&column.name)));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        for (i, label) in STAT_LABELS.iter().enumerate() {
            out.push_str(&format!("<tr><th>{label}</th>"));
            for column in &self.columns {
                out.push_str(&format!("<td>{}</td>", Self::cell(label, column.values()[i])));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>");
        out
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "")?;
        for column in &self.columns {
            write!(f, " {:>12}", column.name)?;
        }
        writeln!(f)?;
        for (i, label) in STAT_LABELS.iter().enumerate() {
            write!(f, "{label:>6}")?;
            for column in &self.columns {
                write!(f, " {:>12}", Self::cell(label, column.values()[i]))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use hobart_data::ReturnObservation;

    fn series() -> ReturnSeries {
        let observations = [0.01, -0.02, 0.03, 0.04]
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let date = NaiveDate::from_ymd_opt(2024, i as u32 + 1, 28).unwrap();
                ReturnObservation::new(date, *r, [r / 2.0, *r, 0.001])
            })
            .collect();
        ReturnSeries::new("MAS", observations).unwrap()
    }

    #[test]
    fn test_summary_columns() {
        let table = SummaryTable::from_series(&series()).unwrap();
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["MAS", "SP500", "VW", "TYX"]);

        let mas = table.column("MAS").unwrap();
        assert_eq!(mas.count, 4);
        assert_abs_diff_eq!(mas.mean, 0.015, epsilon = 1e-12);
        assert_eq!(table.column("TYX").unwrap().std, 0.0);
        assert!(table.column("XYZ").is_none());
    }

    #[test]
    fn test_summary_display() {
        let text = SummaryTable::from_series(&series()).unwrap().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("MAS"));
        assert!(lines[1].trim_start().starts_with("count"));
        assert!(lines[8].trim_start().starts_with("max"));
    }

    #[test]
    fn test_summary_html() {
        let html = SummaryTable::from_series(&series()).unwrap().to_html();
        assert!(html.contains("<th>25%</th>"));
        assert_eq!(html.matches("<tr>").count(), 9);
    }
}
