//! Static narrative templates.
//!
//! Templates only ever see the report metadata. Placeholders: `{ticker}`,
//! `{stock_name}`, `{start}`, `{end}`.

use crate::report::ReportMetadata;
use serde::{Deserialize, Serialize};

/// A headed run of paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    /// Heading
    pub heading: String,
    /// Body paragraphs
    pub paragraphs: Vec<String>,
}

/// One step of a spreadsheet walk-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkthroughStep {
    /// Step title
    pub title: String,
    /// Instructions
    pub items: Vec<String>,
}

/// Spreadsheet instructions reproducing one report section by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walkthrough {
    /// Heading
    pub heading: String,
    /// Steps in order
    pub steps: Vec<WalkthroughStep>,
}

type StepTemplate = (&'static str, &'static [&'static str]);

const INTRODUCTION: &[&str] = &[
    "What drives the price of {stock_name}? This report asks whether the broad market, \
     the value-weighted market or long-term interest rates explain its monthly moves.",
    "Beta is the market coefficient. A beta of 1.5 means {ticker} has tended to move 1.5% \
     for every 1% move in the market; a beta of 0.8 means it has moved less than the market.",
    "Stars mark statistically significant coefficients, and R² measures how much of \
     {ticker}'s monthly variation a model explains.",
    "High-growth technology names often carry betas above 1.2, utilities usually sit \
     between 0.5 and 0.8, and some gold miners move against the market.",
    "The bottom line: if the market rises 10%, how much should we expect {ticker} to move?",
];

const TABLE_GUIDE: &[&str] = &[
    "Coefficients show how much {ticker} moves when a factor moves by 1%.",
    "Standard errors, in parentheses, measure how precise each estimate is. Smaller is better.",
    "Stars flag results unlikely to be random: * at 10%, ** at 5%, *** at 1%.",
    "Model (1) compares {ticker} with the S&P 500, model (2) with the value-weighted market \
     and model (3) with the 30-year Treasury yield.",
    "Model (4) combines both market measures and model (5) adds the Treasury yield. \
     The full model usually has the highest R².",
    "In the S,R² column, S is the residual standard error (the typical prediction miss) \
     and R² is the share of {ticker}'s movement the model explains.",
];

const REGRESSION_STEPS: &[StepTemplate] = &[
    (
        "Step 1: Prepare your data",
        &[
            "Download monthly prices for {ticker}, the S&P 500, the value-weighted market and the 30-year Treasury yield",
            "Compute monthly log returns with =LN(Price_t / Price_t-1)",
            "Lay out columns: Date, {ticker}, SP500, VW, TYX",
        ],
    ),
    (
        "Step 2: Enable the Analysis ToolPak",
        &[
            "File > Options > Add-ins",
            "Choose Analysis ToolPak and click Go, then tick it and click OK",
        ],
    ),
    (
        "Step 3: Run the regression",
        &[
            "Data > Data Analysis > Regression",
            "Input Y Range: the {ticker} return column",
            "Input X Range: the factor columns of the model",
            "Tick Labels if the first row holds headers",
        ],
    ),
    (
        "Step 4: Read the output",
        &[
            "Coefficients, Standard Error and P-value columns give the table cells",
            "Regression Statistics give R Square and the standard error",
        ],
    ),
    (
        "Step 5: Repeat for each model",
        &[
            "(1) SP500, (2) VW, (3) TYX, (4) SP500 + VW, (5) SP500 + VW + TYX",
            "Mark p < 0.01 with ***, p < 0.05 with ** and p < 0.10 with *",
        ],
    ),
];

const NORMAL_STEPS: &[StepTemplate] = &[
    (
        "Step 1: Calculate statistics",
        &[
            "Mean: =AVERAGE(returns)",
            "Standard deviation: =STDEV.S(returns)",
            "Create a column of bin edges, e.g. -0.15 to 0.15 in steps of 0.05",
        ],
    ),
    (
        "Step 2: Build the histogram",
        &[
            "Insert > Charts > Histogram, or Data Analysis > Histogram with your bin range",
        ],
    ),
    (
        "Step 3: Add the normal curve",
        &[
            "Next to each bin compute =NORM.DIST(x, mean, std_dev, FALSE)",
            "Add the result as a line series on the histogram",
        ],
    ),
    (
        "Step 4: Format the chart",
        &[
            "Title: {ticker} Monthly Returns with Normal Distribution Fit",
            "Axes: Monthly Return and Density",
            "Semi-transparent bars, a thicker red curve",
        ],
    ),
];

const CDF_STEPS: &[StepTemplate] = &[
    (
        "Step 1: Prepare data",
        &[
            "Sort the returns from smallest to largest",
            "Next to them compute the cumulative probability =(ROW()-2)/(COUNT(A:A)-1) when data starts in row 2",
        ],
    ),
    (
        "Step 2: Plot",
        &[
            "Insert > Charts > Scatter with markers, returns on X and probability on Y",
        ],
    ),
    (
        "Step 3: Add the S&P 500",
        &[
            "Select Data > Add, using sorted S&P 500 returns and their probabilities",
        ],
    ),
    (
        "Step 4: Format",
        &[
            "Triangles for {ticker}, squares for the S&P 500",
            "Title: Distribution of Monthly Returns: {ticker} vs S&P 500",
            "Axes: Return and Cumulative Probability, add gridlines if helpful",
        ],
    ),
];

fn fill(template: &str, meta: &ReportMetadata) -> String {
    template
        .replace("{ticker}", &meta.ticker)
        .replace("{stock_name}", &meta.stock_name)
        .replace("{start}", &meta.start.to_string())
        .replace("{end}", &meta.end.to_string())
}

fn narrative(heading: &str, paragraphs: &[&str], meta: &ReportMetadata) -> Narrative {
    Narrative {
        heading: fill(heading, meta),
        paragraphs: paragraphs.iter().map(|p| fill(p, meta)).collect(),
    }
}

fn walkthrough(heading: &str, steps: &[StepTemplate], meta: &ReportMetadata) -> Walkthrough {
    Walkthrough {
        heading: fill(heading, meta),
        steps: steps
            .iter()
            .map(|(title, items)| WalkthroughStep {
                title: fill(title, meta),
                items: items.iter().map(|i| fill(i, meta)).collect(),
            })
            .collect(),
    }
}

/// Opening section.
pub fn introduction(meta: &ReportMetadata) -> Narrative {
    narrative("Why This Analysis Matters", INTRODUCTION, meta)
}

/// Guide printed under the regression table.
pub fn table_guide(meta: &ReportMetadata) -> Narrative {
    narrative("How to Read This Table", TABLE_GUIDE, meta)
}

/// Spreadsheet steps for the regressions.
pub fn regression_walkthrough(meta: &ReportMetadata) -> Walkthrough {
    walkthrough("How to Perform This Analysis in Excel", REGRESSION_STEPS, meta)
}

/// Spreadsheet steps for the normal-fit chart.
pub fn normal_walkthrough(meta: &ReportMetadata) -> Walkthrough {
    walkthrough("How to Create the Normal Distribution Graph in Excel", NORMAL_STEPS, meta)
}

/// Spreadsheet steps for the CDF chart.
pub fn cdf_walkthrough(meta: &ReportMetadata) -> Walkthrough {
    walkthrough("How to Create the CDF Graph in Excel", CDF_STEPS, meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn meta() -> ReportMetadata {
        ReportMetadata::new(
            "MAS",
            "MASCO (MAS)",
            NaiveDate::from_ymd_opt(2005, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 30).unwrap(),
        )
    }

    #[test]
    fn test_templates_are_filled() {
        let meta = meta();
        let sections = [introduction(&meta), table_guide(&meta)];
        for section in &sections {
            for p in &section.paragraphs {
                assert!(!p.contains('{'), "unfilled placeholder in {p}");
            }
        }
        assert!(sections[0].paragraphs[0].contains("MASCO (MAS)"));
        assert!(sections[1].paragraphs[0].contains("MAS moves"));
    }

    #[test]
    fn test_walkthroughs() {
        let meta = meta();
        let regression = regression_walkthrough(&meta);
        assert_eq!(regression.steps.len(), 5);
        assert!(regression.steps[0].items[2].contains("Date, MAS, SP500, VW, TYX"));

        assert_eq!(normal_walkthrough(&meta).steps.len(), 4);
        let cdf = cdf_walkthrough(&meta);
        assert!(cdf.steps[3].items[1].ends_with("MAS vs S&P 500"));
    }
}
