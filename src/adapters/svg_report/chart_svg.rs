//! SVG chart rendering for reports.
//!
//! Each function returns a standalone SVG document, or an empty string when
//! there is nothing to draw.

use chrono::NaiveDate;
use std::f64::consts::PI;
use std::fmt::Write;

use crate::domain::analysis::StrategyResult;

const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const LINE_WIDTH: f64 = 800.0;
const LINE_HEIGHT: f64 = 420.0;
const PAD_LEFT: f64 = 70.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 40.0;
const PAD_BOTTOM: f64 = 50.0;

pub struct LineSeries<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// Side-by-side allocation pies, one per strategy. Slices start at twelve
/// o'clock and run counter-clockwise in ticker order.
pub fn generate_allocation_svg(strategies: &[StrategyResult]) -> String {
    if strategies.is_empty() {
        return String::new();
    }

    let panel = 420.0;
    let width = panel * strategies.len() as f64;
    let height = 460.0;
    let radius = 140.0;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="sans-serif">"#
    );
    let _ = write!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

    for (p, strategy) in strategies.iter().enumerate() {
        let cx = panel * p as f64 + panel / 2.0;
        let cy = 250.0;
        let _ = write!(
            svg,
            r#"<text x="{cx:.1}" y="40" text-anchor="middle" font-size="16">{} Portfolio Allocation</text>"#,
            escape_xml(&strategy.name)
        );

        let total: f64 = strategy.weights.values.iter().sum();
        if total <= 0.0 {
            continue;
        }

        let mut angle = -PI / 2.0;
        for (i, (ticker, weight)) in strategy.weights.iter().enumerate() {
            let fraction = weight / total;
            if fraction <= 0.0 {
                continue;
            }
            let sweep = 2.0 * PI * fraction;
            let end = angle - sweep;

            if fraction >= 1.0 - 1e-12 {
                let _ = write!(
                    svg,
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{}"/>"#,
                    color(i)
                );
            } else {
                let (x0, y0) = (cx + radius * angle.cos(), cy + radius * angle.sin());
                let (x1, y1) = (cx + radius * end.cos(), cy + radius * end.sin());
                let large_arc = if fraction > 0.5 { 1 } else { 0 };
                let _ = write!(
                    svg,
                    r#"<path d="M {cx:.1} {cy:.1} L {x0:.1} {y0:.1} A {radius:.1} {radius:.1} 0 {large_arc} 0 {x1:.1} {y1:.1} Z" fill="{}" stroke="white"/>"#,
                    color(i)
                );
            }

            let mid = angle - sweep / 2.0;
            let (lx, ly) = (cx + radius * 1.18 * mid.cos(), cy + radius * 1.18 * mid.sin());
            let (px, py) = (cx + radius * 0.62 * mid.cos(), cy + radius * 0.62 * mid.sin());
            let _ = write!(
                svg,
                r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                escape_xml(ticker)
            );
            let _ = write!(
                svg,
                r#"<text x="{px:.1}" y="{py:.1}" text-anchor="middle" font-size="11" fill="white">{:.2}%</text>"#,
                fraction * 100.0
            );

            angle = end;
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Line chart of one or more series sharing a date axis. `NaN` values break
/// the line instead of being drawn.
pub fn generate_line_chart_svg(
    title: &str,
    y_label: &str,
    dates: &[NaiveDate],
    series: &[LineSeries],
) -> String {
    let finite = || {
        series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
    };
    let min_v = finite().fold(f64::INFINITY, f64::min);
    let max_v = finite().fold(f64::NEG_INFINITY, f64::max);
    if dates.is_empty() || !min_v.is_finite() {
        return String::new();
    }

    let (lo, hi) = if max_v > min_v {
        (min_v, max_v)
    } else {
        (min_v - 1.0, max_v + 1.0)
    };

    let plot_w = LINE_WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_h = LINE_HEIGHT - PAD_TOP - PAD_BOTTOM;
    let scale_x = if dates.len() > 1 {
        plot_w / (dates.len() - 1) as f64
    } else {
        0.0
    };
    let to_x = |i: usize| PAD_LEFT + i as f64 * scale_x;
    let to_y = |v: f64| PAD_TOP + plot_h - (v - lo) / (hi - lo) * plot_h;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{LINE_WIDTH:.0}" height="{LINE_HEIGHT:.0}" viewBox="0 0 {LINE_WIDTH:.0} {LINE_HEIGHT:.0}" font-family="sans-serif">"#
    );
    let _ = write!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        LINE_WIDTH / 2.0,
        escape_xml(title)
    );

    // Axes
    let x_axis_y = PAD_TOP + plot_h;
    let x_end = PAD_LEFT + plot_w;
    let _ = write!(
        svg,
        r#"<line x1="{PAD_LEFT:.1}" y1="{PAD_TOP:.1}" x2="{PAD_LEFT:.1}" y2="{x_axis_y:.1}" stroke="black"/>"#
    );
    let _ = write!(
        svg,
        r#"<line x1="{PAD_LEFT:.1}" y1="{x_axis_y:.1}" x2="{x_end:.1}" y2="{x_axis_y:.1}" stroke="black"/>"#
    );

    // Y ticks at the bounds and midpoint
    for v in [lo, (lo + hi) / 2.0, hi] {
        let y = to_y(v);
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{v:.2}</text>"#,
            PAD_LEFT - 6.0,
            y + 4.0
        );
    }
    if lo < 0.0 && hi > 0.0 {
        let y0 = to_y(0.0);
        let _ = write!(
            svg,
            r##"<line x1="{PAD_LEFT:.1}" y1="{y0:.1}" x2="{x_end:.1}" y2="{y0:.1}" stroke="#cccccc" stroke-dasharray="4 4"/>"##
        );
    }

    // X labels: first and last date
    let label_y = x_axis_y + 18.0;
    let _ = write!(
        svg,
        r#"<text x="{PAD_LEFT:.1}" y="{label_y:.1}" text-anchor="start" font-size="11">{}</text>"#,
        dates[0]
    );
    let _ = write!(
        svg,
        r#"<text x="{x_end:.1}" y="{label_y:.1}" text-anchor="end" font-size="11">{}</text>"#,
        dates[dates.len() - 1]
    );
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">Date</text>"#,
        PAD_LEFT + plot_w / 2.0,
        LINE_HEIGHT - 8.0
    );
    let _ = write!(
        svg,
        r#"<text x="16" y="{:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 16 {:.1})">{}</text>"#,
        PAD_TOP + plot_h / 2.0,
        PAD_TOP + plot_h / 2.0,
        escape_xml(y_label)
    );

    for (s, line) in series.iter().enumerate() {
        let mut d = String::new();
        let mut pen_down = false;
        for (i, &v) in line.values.iter().enumerate().take(dates.len()) {
            if !v.is_finite() {
                pen_down = false;
                continue;
            }
            let cmd = if pen_down { 'L' } else { 'M' };
            let _ = write!(d, "{cmd} {:.1} {:.1} ", to_x(i), to_y(v));
            pen_down = true;
        }
        if !d.is_empty() {
            let _ = write!(
                svg,
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
                d.trim_end(),
                color(s)
            );
        }

        // Legend
        let ly = PAD_TOP + 10.0 + 18.0 * s as f64;
        let lx = x_end - 170.0;
        let _ = write!(
            svg,
            r#"<line x1="{lx:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" stroke="{}" stroke-width="2"/>"#,
            lx + 20.0,
            color(s)
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            lx + 26.0,
            ly + 4.0,
            escape_xml(line.label)
        );
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::Metrics;
    use crate::domain::portfolio::PortfolioReturns;
    use crate::domain::weights::Weights;

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
            })
            .collect()
    }

    fn strategy(name: &str, tickers: &[&str], values: Vec<f64>) -> StrategyResult {
        StrategyResult {
            name: name.to_string(),
            weights: Weights::new(tickers.iter().map(|t| t.to_string()).collect(), values)
                .unwrap(),
            risk_contributions: vec![],
            returns: PortfolioReturns {
                dates: vec![],
                values: vec![],
            },
            growth: vec![],
            rolling_sharpe: vec![],
            metrics: Metrics::compute(&[], 252.0),
        }
    }

    #[test]
    fn allocation_empty() {
        assert_eq!(generate_allocation_svg(&[]), "");
    }

    #[test]
    fn allocation_draws_one_slice_per_weight() {
        let svg = generate_allocation_svg(&[
            strategy("Equally Weighted", &["A", "B", "C", "D"], vec![0.25; 4]),
            strategy("Risk Parity", &["A", "B", "C", "D"], vec![0.1, 0.2, 0.3, 0.4]),
        ]);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<path").count(), 8);
        assert!(svg.contains("Equally Weighted Portfolio Allocation"));
        assert!(svg.contains("Risk Parity Portfolio Allocation"));
        assert!(svg.contains("25.00%"));
        assert!(svg.contains("40.00%"));
    }

    #[test]
    fn allocation_first_slice_starts_at_top() {
        let svg = generate_allocation_svg(&[strategy("S", &["A", "B"], vec![0.5, 0.5])]);
        // cx = 210, cy = 250, r = 140: top of the circle is (210, 110).
        assert!(svg.contains("L 210.0 110.0"));
    }

    #[test]
    fn allocation_full_weight_is_circle() {
        let svg = generate_allocation_svg(&[strategy("S", &["A", "B"], vec![1.0, 0.0])]);
        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.contains("100.00%"));
    }

    #[test]
    fn allocation_escapes_names() {
        let svg = generate_allocation_svg(&[strategy("A&B", &["X<Y"], vec![1.0])]);
        assert!(svg.contains("A&amp;B"));
        assert!(svg.contains("X&lt;Y"));
    }

    #[test]
    fn line_chart_empty_inputs() {
        assert_eq!(generate_line_chart_svg("t", "y", &[], &[]), "");
        let nan = [f64::NAN, f64::NAN];
        let svg = generate_line_chart_svg(
            "t",
            "y",
            &dates(2),
            &[LineSeries {
                label: "a",
                values: &nan,
            }],
        );
        assert_eq!(svg, "");
    }

    #[test]
    fn line_chart_one_path_per_series() {
        let a = [1.0, 1.1, 1.2];
        let b = [1.0, 0.9, 1.05];
        let svg = generate_line_chart_svg(
            "Cumulative Returns Comparison",
            "Cumulative Returns",
            &dates(3),
            &[
                LineSeries {
                    label: "Equally Weighted",
                    values: &a,
                },
                LineSeries {
                    label: "Risk Parity",
                    values: &b,
                },
            ],
        );

        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("Cumulative Returns Comparison"));
        assert!(svg.contains("2024-01-01"));
        assert!(svg.contains("2024-01-03"));
        assert!(svg.contains("Risk Parity"));
    }

    #[test]
    fn line_chart_nan_breaks_line() {
        let values = [f64::NAN, f64::NAN, 0.5, 0.7, f64::NAN, 0.6];
        let svg = generate_line_chart_svg(
            "Rolling Sharpe",
            "Sharpe Ratio",
            &dates(6),
            &[LineSeries {
                label: "s",
                values: &values,
            }],
        );
        let path = svg.split("<path d=\"").nth(1).unwrap();
        let d = &path[..path.find('"').unwrap()];
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('L').count(), 1);
    }

    #[test]
    fn line_chart_flat_series_is_drawn() {
        let values = [1.0, 1.0, 1.0];
        let svg = generate_line_chart_svg(
            "flat",
            "y",
            &dates(3),
            &[LineSeries {
                label: "s",
                values: &values,
            }],
        );
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(!svg.contains("NaN"));
    }
}
