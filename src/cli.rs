//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::console_report::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report::SvgReportAdapter;
use crate::domain::analysis::{self, AnalysisConfig};
use crate::domain::config_validation::{
    resolve_date, validate_analysis_config, validate_data_config, validate_risk_parity_config,
    DEFAULT_SOURCE,
};
use crate::domain::error::ParityError;
use crate::domain::risk_parity::{RiskParityAllocator, RiskParityConfig};
use crate::domain::universe::{parse_tickers, Universe};
use crate::ports::allocator_port::AllocatorPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "parity",
    about = "Compare equal-weight and risk-parity portfolios"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch prices, build both portfolios and report their performance
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory of `<TICKER>.csv` price files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Comma-separated ticker list, overriding the config
        #[arg(long)]
        tickers: Option<String>,
        /// Directory for SVG charts
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            data_dir,
            tickers,
            output,
            dry_run,
        } => run_analyze(
            config.as_ref(),
            data_dir.as_ref(),
            tickers.as_deref(),
            output.as_ref(),
            dry_run,
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: ParityError) -> ExitCode {
    error!("{err}");
    ExitCode::from(&err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ParityError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| ParityError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), ParityError> {
    validate_analysis_config(config)?;
    validate_risk_parity_config(config)?;
    validate_data_config(config)?;
    Ok(())
}

/// Ticker universe from `--tickers`, `[analysis] tickers`, or the defaults.
pub fn resolve_tickers(
    tickers_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Universe, ParityError> {
    let tickers = match tickers_override {
        Some(list) => parse_tickers(list)?,
        None => match config.get_string("analysis", "tickers") {
            Some(list) => parse_tickers(&list)?,
            None => return Ok(Universe::default()),
        },
    };
    Ok(Universe::new(tickers))
}

/// Analysis settings from the `[analysis]` section, validated first.
pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, ParityError> {
    validate_analysis_config(config)?;
    let defaults = AnalysisConfig::default();

    Ok(AnalysisConfig {
        tickers: resolve_tickers(None, config)?.tickers,
        start_date: resolve_date(config, "start_date", defaults.start_date)?,
        end_date: resolve_date(config, "end_date", defaults.end_date)?,
        trading_days: config.get_double("analysis", "trading_days", defaults.trading_days),
        rolling_window: config.get_int(
            "analysis",
            "rolling_window",
            defaults.rolling_window as i64,
        ) as usize,
    })
}

pub fn build_risk_parity_config(config: &dyn ConfigPort) -> RiskParityConfig {
    let defaults = RiskParityConfig::default();
    RiskParityConfig {
        max_iterations: config
            .get_int(
                "risk_parity",
                "max_iterations",
                defaults.max_iterations as i64,
            )
            .max(1) as usize,
        tolerance: config.get_double("risk_parity", "tolerance", defaults.tolerance),
    }
}

/// `--output`, else `[report] output_dir`; `None` means no chart files.
pub fn resolve_output_dir(
    output_override: Option<&PathBuf>,
    config: &dyn ConfigPort,
) -> Option<PathBuf> {
    output_override.cloned().or_else(|| {
        config
            .get_string("report", "output_dir")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    })
}

pub fn build_data_port(
    config: &dyn ConfigPort,
    data_dir_override: Option<&PathBuf>,
) -> Result<Box<dyn DataPort>, ParityError> {
    let source = config.get_string_or("data", "source", DEFAULT_SOURCE).to_lowercase();
    match source.as_str() {
        "csv" => {
            let dir = data_dir_override
                .cloned()
                .unwrap_or_else(|| PathBuf::from(config.get_string_or("data", "data_dir", "data")));
            info!(dir = %dir.display(), "reading prices from CSV files");
            Ok(Box::new(CsvAdapter::new(dir)))
        }
        #[cfg(feature = "yahoo")]
        "yahoo" => {
            use crate::adapters::yahoo_adapter::YahooAdapter;
            info!("reading prices from Yahoo Finance");
            Ok(Box::new(YahooAdapter::new()?))
        }
        other => Err(ParityError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unsupported data source '{other}'"),
        }),
    }
}

fn run_analyze(
    config_path: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
    tickers: Option<&str>,
    output: Option<&PathBuf>,
    dry_run: bool,
) -> ExitCode {
    // Stage 0: configuration
    let config = match config_path {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => return fail(e),
        },
        None => FileConfigAdapter::empty(),
    };
    if let Err(e) = validate_config(&config) {
        return fail(e);
    }

    let mut analysis_config = match build_analysis_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let universe = match resolve_tickers(tickers, &config) {
        Ok(u) => u,
        Err(e) => return fail(e),
    };
    info!(
        tickers = universe.count(),
        start = %analysis_config.start_date,
        end = %analysis_config.end_date,
        "analysis configured"
    );
    analysis_config.tickers = universe.tickers;

    let rp_config = build_risk_parity_config(&config);
    let output_dir = resolve_output_dir(output, &config);

    if dry_run {
        return report_dry_run(&analysis_config, &rp_config, output_dir.as_deref());
    }

    let data_port = match build_data_port(&config, data_dir) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    let allocator = RiskParityAllocator::new(rp_config);

    run_analysis_pipeline(
        data_port.as_ref(),
        &allocator,
        &analysis_config,
        output_dir.as_ref(),
    )
}

fn report_dry_run(
    analysis_config: &AnalysisConfig,
    rp_config: &RiskParityConfig,
    output_dir: Option<&Path>,
) -> ExitCode {
    info!(tickers = %analysis_config.tickers.join(","), "universe");
    info!(
        start = %analysis_config.start_date,
        end = %analysis_config.end_date,
        trading_days = analysis_config.trading_days,
        rolling_window = analysis_config.rolling_window,
        "period"
    );
    info!(
        max_iterations = rp_config.max_iterations,
        tolerance = rp_config.tolerance,
        "risk parity solver"
    );
    match output_dir {
        Some(dir) => info!(dir = %dir.display(), "charts would be written"),
        None => info!("no output directory, charts disabled"),
    }
    info!("dry run complete: configuration is valid");
    ExitCode::SUCCESS
}

/// Run the analysis, print the tables and, with an output directory, write
/// the charts.
pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    allocator: &dyn AllocatorPort,
    analysis_config: &AnalysisConfig,
    output_dir: Option<&PathBuf>,
) -> ExitCode {
    let report = match analysis::run_analysis(data_port, allocator, analysis_config) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    if let Err(e) = ConsoleReportAdapter.write(&report) {
        return fail(e);
    }

    if let Some(dir) = output_dir {
        if let Err(e) = SvgReportAdapter::new(dir).write(&report) {
            return fail(e);
        }
    }

    info!("analysis complete");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    if let Err(e) = validate_config(&config) {
        return fail(e);
    }

    let analysis_config = match build_analysis_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let rp_config = build_risk_parity_config(&config);
    report_dry_run(
        &analysis_config,
        &rp_config,
        resolve_output_dir(None, &config).as_deref(),
    )
}
