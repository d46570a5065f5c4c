//! Hobart CLI binary.
//!
//! Runs the monthly factor regression report for one stock and writes the
//! HTML report, CSV exports and charts.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use hobart::data::yahoo::YahooQuoteProvider;
use hobart::factors::{available_factors, get_factor_info};
use hobart::output::{LEGEND, SvgChartRenderer};
use hobart::pipeline::{DEFAULT_END, DEFAULT_START};
use hobart::stats::DescriptiveStats;
use hobart::{Analysis, AnalysisRequest, StockCatalog, run_analysis};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: monthly factor regression reports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Regress a stock's monthly returns on the market factors
    Analyze {
        /// Stock display name from the catalog
        #[arg(long, conflicts_with = "ticker")]
        stock: Option<String>,

        /// Ticker symbol, need not be in the catalog
        #[arg(long)]
        ticker: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long, default_value = DEFAULT_START)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long, default_value = DEFAULT_END)]
        end: NaiveDate,

        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// JSON stock catalog replacing the bundled list (MASCO is always kept)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Pause between Yahoo requests in milliseconds
        #[arg(long, default_value_t = 250)]
        rate_limit_ms: u64,
    },

    /// List the market factor proxies
    Factors {
        /// Show a single factor by column name or Yahoo symbol
        #[arg(long)]
        name: Option<String>,
    },

    /// List the stock catalog
    Stocks {
        /// JSON stock catalog replacing the bundled list (MASCO is always kept)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            stock,
            ticker,
            start,
            end,
            out,
            format,
            catalog,
            rate_limit_ms,
        } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let entry = catalog.resolve(stock.as_deref(), ticker.as_deref())?;
            let request = AnalysisRequest::new(entry.ticker, entry.name, start, end);
            let out = out.unwrap_or_else(default_output_dir);
            analyze(request, &out, format, Duration::from_millis(rate_limit_ms)).await?;
        }
        Commands::Factors { name } => list_factors(name.as_deref())?,
        Commands::Stocks { catalog } => {
            list_stocks(&load_catalog(catalog.as_deref())?);
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<StockCatalog, hobart::PipelineError> {
    let catalog = path.map_or_else(|| Ok(StockCatalog::new()), StockCatalog::from_path)?;
    tracing::debug!(stocks = catalog.len(), custom = path.is_some(), "loaded stock catalog");
    Ok(catalog)
}

fn default_output_dir() -> PathBuf {
    dirs::download_dir().map_or_else(|| PathBuf::from("hobart-output"), |d| d.join("hobart"))
}

fn list_factors(name: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let factors = match name {
        Some(name) => vec![
            get_factor_info(name).ok_or_else(|| format!("Unknown factor: {name}"))?,
        ],
        None => available_factors(),
    };

    println!("{:<8} {:<8} {:<14} Description", "Column", "Symbol", "Header");
    println!("{}", "-".repeat(72));
    for info in factors {
        println!(
            "{:<8} {:<8} {:<14} {}",
            info.column, info.symbol, info.display_name, info.description
        );
    }
    Ok(())
}

fn list_stocks(catalog: &StockCatalog) {
    println!("{:<24} Ticker", "Stock");
    println!("{}", "-".repeat(32));
    for entry in catalog.iter() {
        println!("{:<24} {}", entry.name, entry.ticker);
    }
    println!("\n{} stocks", catalog.len());
}

async fn analyze(
    request: AnalysisRequest,
    out: &Path,
    format: OutputFormat,
    rate_limit: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        ticker = %request.ticker,
        out = %out.display(),
        rate_limit_ms = rate_limit.as_millis(),
        "analyze"
    );
    let provider = YahooQuoteProvider::with_rate_limit(rate_limit)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Fetching prices for {}...", request.ticker));

    let analysis = match run_analysis(&provider, &SvgChartRenderer::new(), request).await {
        Ok(analysis) => {
            pb.finish_and_clear();
            analysis
        }
        Err(e) => {
            tracing::error!(error = %e, "analysis aborted");
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    let written = analysis.write_outputs(out)?;
    let files: Vec<String> = written.all().iter().map(|p| p.display().to_string()).collect();

    match format {
        OutputFormat::Text => print_text(&analysis, &files),
        OutputFormat::Json => print_json(&analysis, &files)?,
    }

    Ok(())
}

fn print_stats_row(label: &str, stats: &DescriptiveStats) {
    println!(
        "  {:<10} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
        label, stats.mean, stats.std, stats.min, stats.max
    );
}

fn print_text(analysis: &Analysis, files: &[String]) {
    let request = &analysis.request;
    let series = &analysis.series;

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!(
        "║{:^62}║",
        format!("{} STOCK RETURNS ANALYSIS", request.stock_name.to_uppercase())
    );
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Analysis Period: {} to {}", request.start, request.end);
    println!("Observations:    {}", series.len());
    println!("Variables:       {}", series.width());
    println!(
        "Months:          {} to {}",
        series.first_date().format("%Y-%m"),
        series.last_date().format("%Y-%m")
    );

    println!("\nMonthly Return Regressions");
    print!("{}", analysis.table.to_ascii());
    println!("Standard errors in parentheses");
    println!("{LEGEND}");

    if let Some(summary) = &analysis.summary {
        println!("\nSummary Statistics");
        print!("{summary}");
    }

    if let Some(distribution) = &analysis.distribution {
        let fit = distribution.normal;
        println!("\nNormal Distribution Fit");
        println!("  Mean (μ):               {:.4}", fit.mu);
        println!("  Standard Deviation (σ): {:.4}", fit.sigma);
        println!("  Variance (σ²):          {:.4}", fit.variance());

        println!("\nCDF Comparison");
        println!(
            "  {:<10} {:>10} {:>10} {:>10} {:>10}",
            "", "Mean", "Std Dev", "Min", "Max"
        );
        print_stats_row(&request.ticker, &distribution.target_stats);
        print_stats_row(distribution.reference.display_name(), &distribution.reference_stats);
    } else {
        println!("\nDistribution analysis unavailable");
    }

    if let Err(e) = &analysis.report {
        println!("\nReport not generated: {e}");
    }

    println!("\nFiles written:");
    for file in files {
        println!("  {file}");
    }
}

fn print_json(analysis: &Analysis, files: &[String]) -> Result<(), serde_json::Error> {
    let request = &analysis.request;
    let failures: Vec<_> = analysis
        .regressions
        .failures()
        .map(|(model, e)| json!({ "model": model.to_string(), "error": e.to_string() }))
        .collect();
    let regressions: Vec<_> = analysis.regressions.successful().collect();

    let output = json!({
        "ticker": request.ticker,
        "stock_name": request.stock_name,
        "start": request.start,
        "end": request.end,
        "observations": analysis.series.len(),
        "regressions": regressions,
        "failed_models": failures,
        "summary": analysis.summary,
        "distribution": analysis.distribution,
        "report_error": analysis.report.as_ref().err().map(ToString::to_string),
        "files": files,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
