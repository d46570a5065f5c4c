//! Chart rendering.
//!
//! The report only positions charts; it never looks inside them. A
//! [`ChartRenderer`] turns distribution data into an opaque
//! [`RenderedChart`] and hands the plotted numbers back alongside it.
//! [`SvgChartRenderer`] draws standalone SVG documents.

use crate::report::ReportError;
use crate::table::escape_html;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hobart_stats::{CdfPoint, DEFAULT_BINS, Histogram, NormalFit, histogram};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 432.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 52.0;
const TICKS: usize = 5;
const CURVE_POINTS: usize = 200;

const HISTOGRAM_COLOR: &str = "#87ceeb";
const CURVE_COLOR: &str = "#d62728";
const TARGET_COLOR: &str = "#ff0000";
const REFERENCE_COLOR: &str = "#0000ff";
const GRID_COLOR: &str = "#e0e0e0";

/// An encoded chart image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedChart {
    /// MIME type, e.g. `image/svg+xml`
    pub media_type: String,
    /// Encoded image
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

impl RenderedChart {
    /// Wrap an SVG document.
    pub fn svg(document: String) -> Self {
        Self {
            media_type: "image/svg+xml".to_string(),
            bytes: document.into_bytes(),
        }
    }

    /// File extension matching the media type.
    pub fn extension(&self) -> &str {
        match self.media_type.as_str() {
            "image/svg+xml" => "svg",
            "image/png" => "png",
            _ => "bin",
        }
    }

    /// `data:` URI for inline embedding.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

/// A rendered chart plus the numbers it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOutput<D> {
    /// The image
    pub image: RenderedChart,
    /// Plotted data
    pub data: D,
}

/// Data behind the normal-fit chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalChartData {
    /// Density histogram of the returns
    pub histogram: Histogram,
    /// `(x, pdf(x))` samples of the fitted curve
    pub curve: Vec<(f64, f64)>,
    /// The fit drawn
    pub fit: NormalFit,
}

/// Data behind the CDF comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdfChartData {
    /// Target curve
    pub target: Vec<CdfPoint>,
    /// Reference curve
    pub reference: Vec<CdfPoint>,
}

/// Something that can draw the two report charts.
pub trait ChartRenderer {
    /// Histogram of `returns` with the fitted normal density overlaid.
    ///
    /// # Errors
    ///
    /// Fails if `returns` is empty.
    fn normal_fit(
        &self,
        label: &str,
        returns: &[f64],
        fit: &NormalFit,
    ) -> Result<ChartOutput<NormalChartData>, ReportError>;

    /// Two empirical CDFs on shared axes.
    ///
    /// # Errors
    ///
    /// Fails if either curve is empty.
    fn cdf_comparison(
        &self,
        label: &str,
        target_cdf: &[CdfPoint],
        reference_label: &str,
        reference_cdf: &[CdfPoint],
    ) -> Result<ChartOutput<CdfChartData>, ReportError>;
}

/// Hand-built SVG renderer.
#[derive(Debug, Clone, Copy)]
pub struct SvgChartRenderer {
    bins: usize,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self { bins: DEFAULT_BINS }
    }
}

impl SvgChartRenderer {
    /// Renderer with the default bin count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the histogram bin count.
    pub const fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn normal_fit(
        &self,
        label: &str,
        returns: &[f64],
        fit: &NormalFit,
    ) -> Result<ChartOutput<NormalChartData>, ReportError> {
        let histogram = histogram(returns, self.bins)?;
        let (x_min, x_max) = match (histogram.edges.first(), histogram.edges.last()) {
            (Some(lo), Some(hi)) => (*lo, *hi),
            _ => return Err(ReportError::Chart("histogram has no bins".into())),
        };

        let step = (x_max - x_min) / (CURVE_POINTS - 1) as f64;
        let curve: Vec<(f64, f64)> = (0..CURVE_POINTS)
            .map(|i| {
                let x = x_min + step * i as f64;
                (x, fit.pdf(x))
            })
            .collect();

        let y_max = histogram
            .densities
            .iter()
            .copied()
            .chain(curve.iter().map(|(_, y)| *y).filter(|y| y.is_finite()))
            .fold(0.0_f64, f64::max);
        let frame = Frame::new((x_min, x_max), (0.0, nice_ceiling(y_max)));

        let mut svg = svg_header();
        frame.draw_axes(&mut svg, "Monthly Return", "Density");
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="24" text-anchor="middle" class="title">{} Monthly Returns with Normal Distribution Fit</text>"#,
            WIDTH / 2.0,
            escape_html(label)
        );

        let bar_width = histogram.bin_width();
        for (left, density) in histogram.edges.iter().zip(&histogram.densities) {
            let x0 = frame.x(*left);
            let x1 = frame.x(left + bar_width);
            let y = frame.y(*density);
            let _ = write!(
                svg,
                r#"<rect x="{x0:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{HISTOGRAM_COLOR}" fill-opacity="0.6" stroke="white" stroke-width="0.5" />"#,
                w = (x1 - x0).max(0.0),
                h = (frame.y(0.0) - y).max(0.0),
            );
        }

        let points: Vec<String> = curve
            .iter()
            .filter(|(_, y)| y.is_finite())
            .map(|(x, y)| format!("{:.2},{:.2}", frame.x(*x), frame.y(*y)))
            .collect();
        let _ = write!(
            svg,
            r#"<polyline fill="none" stroke="{CURVE_COLOR}" stroke-width="2" points="{}" />"#,
            points.join(" ")
        );

        draw_legend(
            &mut svg,
            &[
                (LegendMark::Bar(HISTOGRAM_COLOR), format!("{label} Monthly Returns")),
                (
                    LegendMark::Line(CURVE_COLOR),
                    format!("Normal Fit (μ={:.4}, σ={:.4})", fit.mu, fit.sigma),
                ),
            ],
        );
        svg.push_str("</svg>");

        Ok(ChartOutput {
            image: RenderedChart::svg(svg),
            data: NormalChartData {
                histogram,
                curve,
                fit: *fit,
            },
        })
    }

    fn cdf_comparison(
        &self,
        label: &str,
        target_cdf: &[CdfPoint],
        reference_label: &str,
        reference_cdf: &[CdfPoint],
    ) -> Result<ChartOutput<CdfChartData>, ReportError> {
        if target_cdf.is_empty() || reference_cdf.is_empty() {
            return Err(ReportError::Chart("empty CDF".into()));
        }

        let (x_min, x_max) = target_cdf
            .iter()
            .chain(reference_cdf)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.value), hi.max(p.value))
            });
        let pad = ((x_max - x_min) * 0.05).max(1e-3);
        let frame = Frame::new((x_min - pad, x_max + pad), (0.0, 1.0));

        let mut svg = svg_header();
        frame.draw_axes(&mut svg, "Return", "Cumulative Probability");
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="24" text-anchor="middle" class="title">Distribution of Monthly Returns: {} vs {}</text>"#,
            WIDTH / 2.0,
            escape_html(label),
            escape_html(reference_label)
        );

        for p in target_cdf {
            triangle(&mut svg, frame.x(p.value), frame.y(p.probability), TARGET_COLOR);
        }
        for p in reference_cdf {
            square(&mut svg, frame.x(p.value), frame.y(p.probability), REFERENCE_COLOR);
        }

        draw_legend(
            &mut svg,
            &[
                (LegendMark::Triangle(TARGET_COLOR), label.to_string()),
                (LegendMark::Square(REFERENCE_COLOR), reference_label.to_string()),
            ],
        );
        svg.push_str("</svg>");

        Ok(ChartOutput {
            image: RenderedChart::svg(svg),
            data: CdfChartData {
                target: target_cdf.to_vec(),
                reference: reference_cdf.to_vec(),
            },
        })
    }
}

/// Maps data coordinates into the plot area.
struct Frame {
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Frame {
    fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let widen = |(lo, hi): (f64, f64)| if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
        Self {
            x_range: widen(x_range),
            y_range: widen(y_range),
        }
    }

    fn x(&self, v: f64) -> f64 {
        let (lo, hi) = self.x_range;
        MARGIN_LEFT + (v - lo) / (hi - lo) * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn y(&self, v: f64) -> f64 {
        let (lo, hi) = self.y_range;
        HEIGHT - MARGIN_BOTTOM - (v - lo) / (hi - lo) * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM)
    }

    fn draw_axes(&self, svg: &mut String, x_label: &str, y_label: &str) {
        let (left, right) = (MARGIN_LEFT, WIDTH - MARGIN_RIGHT);
        let (top, bottom) = (MARGIN_TOP, HEIGHT - MARGIN_BOTTOM);

        for i in 0..=TICKS {
            let t = i as f64 / TICKS as f64;
            let xv = self.x_range.0 + t * (self.x_range.1 - self.x_range.0);
            let yv = self.y_range.0 + t * (self.y_range.1 - self.y_range.0);
            let (x, y) = (self.x(xv), self.y(yv));
            let _ = write!(
                svg,
                r#"<line x1="{x:.2}" y1="{top:.2}" x2="{x:.2}" y2="{bottom:.2}" stroke="{GRID_COLOR}" /><text x="{x:.2}" y="{:.2}" text-anchor="middle">{xv:.3}</text>"#,
                bottom + 14.0
            );
            let _ = write!(
                svg,
                r#"<line x1="{left:.2}" y1="{y:.2}" x2="{right:.2}" y2="{y:.2}" stroke="{GRID_COLOR}" /><text x="{:.2}" y="{:.2}" text-anchor="end">{yv:.2}</text>"#,
                left - 6.0,
                y + 3.0
            );
        }

        let _ = write!(
            svg,
            r##"<rect x="{left:.2}" y="{top:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="#666" />"##,
            right - left,
            bottom - top
        );
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            (left + right) / 2.0,
            HEIGHT - 12.0,
            escape_html(x_label)
        );
        let _ = write!(
            svg,
            r#"<text x="16" y="{:.2}" text-anchor="middle" transform="rotate(-90 16 {:.2})">{}</text>"#,
            (top + bottom) / 2.0,
            (top + bottom) / 2.0,
            escape_html(y_label)
        );
    }
}

enum LegendMark {
    Bar(&'static str),
    Line(&'static str),
    Triangle(&'static str),
    Square(&'static str),
}

fn draw_legend(svg: &mut String, entries: &[(LegendMark, String)]) {
    let x = WIDTH - MARGIN_RIGHT - 230.0;
    let mut y = MARGIN_TOP + 16.0;
    for (mark, text) in entries {
        match mark {
            LegendMark::Bar(color) => {
                let _ = write!(
                    svg,
                    r#"<rect x="{x:.2}" y="{:.2}" width="18" height="10" fill="{color}" fill-opacity="0.6" />"#,
                    y - 9.0
                );
            }
            LegendMark::Line(color) => {
                let _ = write!(
                    svg,
                    r#"<line x1="{x:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{color}" stroke-width="2" />"#,
                    y - 4.0,
                    x + 18.0,
                    y - 4.0
                );
            }
            LegendMark::Triangle(color) => triangle(svg, x + 9.0, y - 4.0, color),
            LegendMark::Square(color) => square(svg, x + 9.0, y - 4.0, color),
        }
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{y:.2}">{}</text>"#,
            x + 24.0,
            escape_html(text)
        );
        y += 16.0;
    }
}

fn triangle(svg: &mut String, cx: f64, cy: f64, color: &str) {
    let _ = write!(
        svg,
        r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{color}" fill-opacity="0.7" />"#,
        cx,
        cy - 4.0,
        cx - 4.0,
        cy + 3.0,
        cx + 4.0,
        cy + 3.0
    );
}

fn square(svg: &mut String, cx: f64, cy: f64, color: &str) {
    let _ = write!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="6" height="6" fill="{color}" fill-opacity="0.7" />"#,
        cx - 3.0,
        cy - 3.0
    );
}

fn svg_header() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}"><style>text{{font-family:Arial,sans-serif;font-size:11px;fill:#444}}.title{{font-size:14px;font-weight:bold;fill:#222}}</style><rect width="100%" height="100%" fill="white" />"#
    )
}

/// Round up to one significant digit step so axis ticks stay readable.
fn nice_ceiling(v: f64) -> f64 {
    if v <= 0.0 || !v.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(v.log10().floor());
    (v / magnitude).ceil() * magnitude
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
