//! Chart files for an analysis.
//!
//! Writes three standalone SVG documents into the output directory:
//! `allocation.svg`, `cumulative_returns.svg` and `rolling_sharpe.svg`.

pub mod chart_svg;

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::ParityError;
use crate::domain::metrics::ROLLING_WINDOW;
use crate::ports::report_port::ReportPort;
use chart_svg::LineSeries;

pub const ALLOCATION_FILE: &str = "allocation.svg";
pub const CUMULATIVE_FILE: &str = "cumulative_returns.svg";
pub const ROLLING_SHARPE_FILE: &str = "rolling_sharpe.svg";

pub struct SvgReportAdapter {
    output_dir: PathBuf,
}

impl SvgReportAdapter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn write_chart(&self, name: &str, svg: String) -> Result<(), ParityError> {
        if svg.is_empty() {
            warn!(chart = name, "nothing to plot, skipping");
            return Ok(());
        }
        let path = self.output_dir.join(name);
        fs::write(&path, svg)?;
        info!(path = %path.display(), "chart written");
        Ok(())
    }
}

pub fn rolling_sharpe_title(window: usize) -> String {
    if window == ROLLING_WINDOW {
        "Rolling Sharpe Ratio (1-Year Window)".to_string()
    } else {
        format!("Rolling Sharpe Ratio ({window}-Day Window)")
    }
}

impl ReportPort for SvgReportAdapter {
    fn write(&self, report: &AnalysisReport) -> Result<(), ParityError> {
        fs::create_dir_all(&self.output_dir)?;

        let dates: Vec<_> = report
            .strategies
            .first()
            .map(|s| s.returns.dates.clone())
            .unwrap_or_default();

        self.write_chart(
            ALLOCATION_FILE,
            chart_svg::generate_allocation_svg(&report.strategies),
        )?;

        let growth: Vec<LineSeries> = report
            .strategies
            .iter()
            .map(|s| LineSeries {
                label: &s.name,
                values: &s.growth,
            })
            .collect();
        self.write_chart(
            CUMULATIVE_FILE,
            chart_svg::generate_line_chart_svg(
                "Cumulative Returns Comparison",
                "Cumulative Returns",
                &dates,
                &growth,
            ),
        )?;

        let sharpe: Vec<LineSeries> = report
            .strategies
            .iter()
            .map(|s| LineSeries {
                label: &s.name,
                values: &s.rolling_sharpe,
            })
            .collect();
        self.write_chart(
            ROLLING_SHARPE_FILE,
            chart_svg::generate_line_chart_svg(
                &rolling_sharpe_title(report.rolling_window),
                "Sharpe Ratio",
                &dates,
                &sharpe,
            ),
        )?;

        Ok(())
    }
}
