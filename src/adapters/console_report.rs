//! Plain-text tables on standard output.
//!
//! Diagnostics go through `tracing` to stderr; stdout carries only the
//! metrics and weights tables so it can be piped.

use std::fmt::Write as _;
use std::io::Write as _;

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::ParityError;
use crate::ports::report_port::ReportPort;

const METRIC_LABEL_WIDTH: usize = 24;
const TICKER_WIDTH: usize = 8;
const MIN_COLUMN_WIDTH: usize = 14;

pub struct ConsoleReportAdapter;

impl ReportPort for ConsoleReportAdapter {
    fn write(&self, report: &AnalysisReport) -> Result<(), ParityError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", render_metrics_table(report))?;
        writeln!(out, "{}", render_weights_table(report))?;
        out.flush()?;
        Ok(())
    }
}

fn column_width(name: &str) -> usize {
    name.len().max(MIN_COLUMN_WIDTH)
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

fn format_percent(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}%", value * 100.0)
    }
}

/// One row per metric, one column per strategy.
pub fn render_metrics_table(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Performance Metrics ({} to {}, {} observations)",
        report.start_date, report.end_date, report.observations
    );

    let _ = write!(out, "{:<METRIC_LABEL_WIDTH$}", "Metric");
    for s in &report.strategies {
        let _ = write!(out, "  {:>w$}", s.name, w = column_width(&s.name));
    }
    out.push('\n');

    let rows: Vec<_> = report.strategies.iter().map(|s| s.metrics.rows()).collect();
    let labels: Vec<&str> = rows
        .first()
        .map(|r| r.iter().map(|(label, _)| *label).collect())
        .unwrap_or_default();

    for (i, label) in labels.iter().enumerate() {
        let _ = write!(out, "{label:<METRIC_LABEL_WIDTH$}");
        for (s, strategy_rows) in report.strategies.iter().zip(&rows) {
            let _ = write!(
                out,
                "  {:>w$}",
                format_value(strategy_rows[i].1),
                w = column_width(&s.name)
            );
        }
        out.push('\n');
    }
    out
}

/// Weight and risk contribution per ticker for every strategy.
pub fn render_weights_table(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Portfolio Weights (risk contribution in parentheses)");

    let cell_widths: Vec<usize> = report
        .strategies
        .iter()
        .map(|s| column_width(&s.name).max(20))
        .collect();

    let _ = write!(out, "{:<TICKER_WIDTH$}", "Ticker");
    for (s, w) in report.strategies.iter().zip(&cell_widths) {
        let _ = write!(out, "  {:>w$}", s.name, w = *w);
    }
    out.push('\n');

    for (i, ticker) in report.tickers.iter().enumerate() {
        let _ = write!(out, "{ticker:<TICKER_WIDTH$}");
        for (s, w) in report.strategies.iter().zip(&cell_widths) {
            let weight = s.weights.values.get(i).copied().unwrap_or(f64::NAN);
            let rc = s.risk_contributions.get(i).copied().unwrap_or(f64::NAN);
            let cell = format!("{} ({})", format_percent(weight), format_percent(rc));
            let _ = write!(out, "  {cell:>w$}", w = *w);
        }
        out.push('\n');
    }
    out
}
