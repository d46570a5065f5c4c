//! Table Formatter
//!
//! Turns a [`RegressionSet`] into the six-column significance table:
//!
//! ```text
//! Regression | Int. | S&P 500 | Val.-Wgtd | 30 Yr Treas. | S,R²
//! ```
//!
//! Each present variable renders as `"{coef:.4}{stars} ({se:.4})"`, absent
//! variables as an empty cell. The last column is `"{residual_se:.4}, {r2:.4}"`.

use derive_more::Display;
use hobart_factors::{ModelSpec, Regressor};
use hobart_stats::{RegressionResult, RegressionSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column headers, in order.
pub const HEADERS: [&str; 6] = [
    "Regression",
    "Int.",
    "S&P 500",
    "Val.-Wgtd",
    "30 Yr Treas.",
    "S,R²",
];

/// Significance legend printed under the table.
pub const LEGEND: &str = "* p<0.1; ** p<0.05; *** p<0.01";

/// Fit cell of a model that could not be estimated.
pub const UNAVAILABLE: &str = "n/a";

/// Significance bucket of a p-value.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Significance {
    /// p >= 0.10
    #[display("")]
    None,
    /// p < 0.10
    #[display("*")]
    Ten,
    /// p < 0.05
    #[display("**")]
    Five,
    /// p < 0.01
    #[display("***")]
    One,
}

impl Significance {
    /// Bucket a p-value. NaN is never significant.
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.01 {
            Self::One
        } else if p < 0.05 {
            Self::Five
        } else if p < 0.10 {
            Self::Ten
        } else {
            Self::None
        }
    }

    /// Star string for the bucket.
    pub const fn stars(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Ten => "*",
            Self::Five => "**",
            Self::One => "***",
        }
    }
}

/// Stars for a p-value.
pub fn significance_stars(p: f64) -> &'static str {
    Significance::from_p_value(p).stars()
}

/// Coefficient cell: `"{coef:.4}{stars} ({se:.4})"`.
pub fn format_cell(coefficient: f64, std_error: f64, p_value: f64) -> String {
    format!(
        "{coefficient:.4}{} ({std_error:.4})",
        significance_stars(p_value)
    )
}

/// One rendered model row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedRegressionRow {
    /// Model label, `"(1)"` to `"(5)"`
    pub label: String,
    /// Intercept, SP500, VW and TYX cells
    pub cells: [String; 4],
    /// `"residual_se, R²"`
    pub fit: String,
}

impl FormattedRegressionRow {
    /// Render a fitted model.
    pub fn from_result(result: &RegressionResult) -> Self {
        let cells = Regressor::CANONICAL.map(|regressor| {
            if !result.model.includes(regressor) {
                return String::new();
            }
            result
                .estimate(regressor)
                .map(|e| format_cell(e.coefficient, e.std_error, e.p_value))
                .unwrap_or_default()
        });

        Self {
            label: result.model.to_string(),
            cells,
            fit: format!("{:.4}, {:.4}", result.residual_std_error, result.r_squared),
        }
    }

    /// Row for a model that failed to fit.
    pub fn unavailable(model: ModelSpec) -> Self {
        Self {
            label: model.to_string(),
            cells: Default::default(),
            fit: UNAVAILABLE.to_string(),
        }
    }

    /// All six cells, label first.
    pub fn columns(&self) -> [&str; 6] {
        [
            self.label.as_str(),
            self.cells[0].as_str(),
            self.cells[1].as_str(),
            self.cells[2].as_str(),
            self.cells[3].as_str(),
            self.fit.as_str(),
        ]
    }
}

/// The formatted regression table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegressionTable {
    rows: Vec<FormattedRegressionRow>,
}

impl RegressionTable {
    /// Format all five slots of a regression set in model order.
    pub fn format(set: &RegressionSet) -> Self {
        let rows = set
            .iter()
            .map(|(model, slot)| match slot {
                Ok(result) => FormattedRegressionRow::from_result(result),
                Err(_) => FormattedRegressionRow::unavailable(model),
            })
            .collect();
        Self { rows }
    }

    /// Format already fitted results, in the order given.
    pub fn from_results(results: &[RegressionResult]) -> Self {
        Self {
            rows: results.iter().map(FormattedRegressionRow::from_result).collect(),
        }
    }

    /// Rows in model order.
    pub fn rows(&self) -> &[FormattedRegressionRow] {
        &self.rows
    }

    /// Column headers.
    pub const fn headers(&self) -> [&'static str; 6] {
        HEADERS
    }

    fn column_widths(&self) -> [usize; 6] {
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row.columns()) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    /// Plain-text table with `+---+` borders.
    pub fn to_ascii(&self) -> String {
        let widths = self.column_widths();
        let rule = {
            let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
            format!("+{}+\n", dashes.join("+"))
        };
        let line = |cells: [&str; 6]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(cell, w)| format!(" {}{} ", cell, " ".repeat(w - cell.chars().count())))
                .collect();
            format!("|{}|\n", padded.join("|"))
        };

        let mut out = rule.clone();
        out.push_str(&line(HEADERS));
        out.push_str(&rule);
        for row in &self.rows {
            out.push_str(&line(row.columns()));
        }
        out.push_str(&rule);
        out
    }

    /// GitHub-flavoured Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("| {} |\n", HEADERS.join(" | "));
        out.push_str(&format!("|{}\n", "---|".repeat(HEADERS.len())));
        for row in &self.rows {
            out.push_str(&format!("| {} |\n", row.columns().join(" | ")));
        }
        out
    }

    /// HTML `<table>` element.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<table class=\"regression-table\">\n<thead><tr>");
        for header in HEADERS {
            out.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in row.columns() {
                out.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>");
        out
    }
}

impl fmt::Display for RegressionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

/// Escape text for inclusion in HTML.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_factors::Factor;
    use hobart_stats::CoefficientEstimate;
    use rstest::rstest;

    fn estimate(regressor: Regressor, coefficient: f64, std_error: f64, p_value: f64) -> CoefficientEstimate {
        CoefficientEstimate {
            regressor,
            coefficient,
            std_error,
            t_value: coefficient / std_error,
            p_value,
        }
    }

    fn result(model: ModelSpec) -> RegressionResult {
        let estimates = model
            .regressors()
            .into_iter()
            .map(|r| match r {
                Regressor::Intercept => estimate(r, 0.00123, 0.0041, 0.76),
                Regressor::Factor(Factor::Sp500) => estimate(r, 1.23456, 0.04321, 0.002),
                Regressor::Factor(Factor::ValueWeighted) => estimate(r, -0.5, 0.25, 0.03),
                Regressor::Factor(Factor::TreasuryYield) => estimate(r, 0.1, 0.055, 0.08),
            })
            .collect();

        RegressionResult {
            model,
            target: "MAS".to_string(),
            estimates,
            residual_std_error: 0.06789,
            r_squared: 0.41234,
            adj_r_squared: 0.4,
            f_statistic: 12.0,
            f_p_value: 0.001,
            nobs: 240,
            df_resid: 240 - model.parameter_count(),
        }
    }

    #[rstest]
    #[case(0.005, "***")]
    #[case(0.03, "**")]
    #[case(0.08, "*")]
    #[case(0.5, "")]
    #[case(0.01, "**")]
    #[case(0.10, "")]
    #[case(f64::NAN, "")]
    fn test_significance_stars(#[case] p: f64, #[case] expected: &str) {
        assert_eq!(significance_stars(p), expected);
    }

    #[test]
    fn test_significance_display_matches_stars() {
        assert_eq!(Significance::One.to_string(), "***");
        assert_eq!(Significance::None.to_string(), "");
        assert!(Significance::One > Significance::Ten);
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(1.23456, 0.04321, 0.002), "1.2346*** (0.0432)");
        assert_eq!(format_cell(-0.5, 0.25, 0.5), "-0.5000 (0.2500)");
    }

    #[test]
    fn test_row_cells_follow_canonical_order() {
        let row = FormattedRegressionRow::from_result(&result(ModelSpec::Sp500));

        assert_eq!(row.label, "(1)");
        assert_eq!(row.cells[0], "0.0012 (0.0041)");
        assert_eq!(row.cells[1], "1.2346*** (0.0432)");
        assert_eq!(row.cells[2], "");
        assert_eq!(row.cells[3], "");
        assert_eq!(row.fit, "0.0679, 0.4123");
    }

    #[test]
    fn test_full_model_row() {
        let row = FormattedRegressionRow::from_result(&result(ModelSpec::Full));
        assert_eq!(row.label, "(5)");
        assert_eq!(row.cells[2], "-0.5000** (0.2500)");
        assert_eq!(row.cells[3], "0.1000* (0.0550)");
    }

    #[test]
    fn test_unavailable_row() {
        let row = FormattedRegressionRow::unavailable(ModelSpec::Sp500ValueWeighted);
        assert_eq!(row.columns(), ["(4)", "", "", "", "", "n/a"]);
    }

    #[test]
    fn test_renderers_embed_cells_verbatim() {
        let results: Vec<_> = ModelSpec::ALL.into_iter().map(result).collect();
        let table = RegressionTable::from_results(&results);
        assert_eq!(table.rows().len(), 5);

        let ascii = table.to_ascii();
        assert!(ascii.contains("| Regression |"));
        assert!(ascii.contains("1.2346*** (0.0432)"));
        assert_eq!(ascii.lines().count(), 5 + 4);

        let markdown = table.to_markdown();
        assert!(markdown.starts_with("| Regression | Int. | S&P 500 |"));
        assert!(markdown.contains("| (1) | 0.0012 (0.0041) | 1.2346*** (0.0432) |  |  | 0.0679, 0.4123 |"));

        let html = table.to_html();
        assert!(html.contains("<th>S&amp;P 500</th>"));
        assert!(html.contains("<td>1.2346*** (0.0432)</td>"));
        assert_eq!(html.matches("<tr>").count(), 6);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
