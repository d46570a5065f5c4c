//! Return series construction through the `PriceSource` seam.

use chrono::NaiveDate;
use hobart_data::{
    DataError, PricePoint, PriceTable, StaticPriceSource, build, required_symbols,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One mid-month and one late-month price per symbol for each month of 2024.
fn source(skip_factor_month: Option<u32>) -> StaticPriceSource {
    let mut table = PriceTable::new();
    for (col, symbol) in required_symbols("MAS").into_iter().enumerate() {
        let mut points = Vec::new();
        for m in 1..=12u32 {
            if col == 2 && skip_factor_month == Some(m) {
                continue;
            }
            let level = 100.0 * (1.0 + 0.01 * f64::from(m) * (col as f64 + 1.0));
            points.push(PricePoint::new(date(2024, m, 10), level * 0.99));
            points.push(PricePoint::new(date(2024, m, 25), level));
        }
        table.insert(symbol, points);
    }
    StaticPriceSource::new(table)
}

#[tokio::test]
async fn test_build_monthly_series() {
    let series = build(&source(None), "MAS", date(2024, 1, 1), date(2024, 12, 31))
        .await
        .unwrap();

    assert_eq!(series.len(), 11);
    assert_eq!(series.first_date(), date(2024, 2, 29));
    assert_eq!(series.last_date(), date(2024, 12, 31));
    assert_eq!(series.column_names(), vec!["MAS", "SP500", "VW", "TYX"]);

    let expected = (1.02f64 / 1.01).ln();
    assert!((series.observations()[0].target - expected).abs() < 1e-12);
}

#[tokio::test]
async fn test_gap_in_one_factor_drops_months() {
    // VW has no June prices, so June and July both lose their return
    let series = build(&source(Some(6)), "MAS", date(2024, 1, 1), date(2024, 12, 31))
        .await
        .unwrap();

    assert_eq!(series.len(), 9);
    assert!(!series.dates().contains(&date(2024, 6, 30)));
    assert!(!series.dates().contains(&date(2024, 7, 31)));
}

#[tokio::test]
async fn test_unknown_ticker_is_unavailable() {
    let err = build(&source(None), "ZZZZ", date(2024, 1, 1), date(2024, 12, 31))
        .await
        .unwrap_err();
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn test_reversed_range() {
    let err = build(&source(None), "MAS", date(2024, 12, 31), date(2024, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::InvalidDateRange { .. }));
}
