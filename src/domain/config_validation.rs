//! Configuration validation.
//!
//! Every key is optional; absent keys fall back to the defaults of
//! [`AnalysisConfig`] and [`RiskParityConfig`]. Keys that are present must hold
//! usable values.

use crate::domain::analysis::AnalysisConfig;
use crate::domain::error::ParityError;
use crate::domain::risk_parity::RiskParityConfig;
use crate::domain::universe::parse_tickers;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_SOURCE: &str = "csv";

#[cfg(feature = "yahoo")]
pub const KNOWN_SOURCES: &[&str] = &["csv", "yahoo"];
#[cfg(not(feature = "yahoo"))]
pub const KNOWN_SOURCES: &[&str] = &["csv"];

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), ParityError> {
    validate_tickers(config)?;
    validate_dates(config)?;
    validate_trading_days(config)?;
    validate_rolling_window(config)?;
    Ok(())
}

pub fn validate_risk_parity_config(config: &dyn ConfigPort) -> Result<(), ParityError> {
    validate_max_iterations(config)?;
    validate_tolerance(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), ParityError> {
    let source = config.get_string_or("data", "source", DEFAULT_SOURCE).to_lowercase();
    if !KNOWN_SOURCES.contains(&source.as_str()) {
        return Err(ParityError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!(
                "unknown data source '{}', expected one of: {}",
                source,
                KNOWN_SOURCES.join(", ")
            ),
        });
    }
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), ParityError> {
    if let Some(tickers) = config.get_string("analysis", "tickers") {
        parse_tickers(&tickers)?;
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), ParityError> {
    let defaults = AnalysisConfig::default();
    let start_date = resolve_date(config, "start_date", defaults.start_date)?;
    let end_date = resolve_date(config, "end_date", defaults.end_date)?;

    if start_date >= end_date {
        return Err(ParityError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

/// Parse `[analysis] <key>` as a date, or return `default` when absent.
pub fn resolve_date(
    config: &dyn ConfigPort,
    key: &str,
    default: NaiveDate,
) -> Result<NaiveDate, ParityError> {
    match config.get_string("analysis", key) {
        None => Ok(default),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
            ParityError::ConfigInvalid {
                section: "analysis".to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            }
        }),
    }
}

/// Parse a present, non-blank key as `T`. Absent or blank keys are `None`.
fn parse_present<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, ParityError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| ParityError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("'{raw}' is not a number"),
    })
}

fn validate_trading_days(config: &dyn ConfigPort) -> Result<(), ParityError> {
    let value = parse_present::<f64>(config, "analysis", "trading_days")?
        .unwrap_or(AnalysisConfig::default().trading_days);
    if value <= 0.0 || !value.is_finite() {
        return Err(ParityError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "trading_days".to_string(),
            reason: "trading_days must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_rolling_window(config: &dyn ConfigPort) -> Result<(), ParityError> {
    let value = parse_present::<i64>(config, "analysis", "rolling_window")?
        .unwrap_or(AnalysisConfig::default().rolling_window as i64);
    if value < 2 {
        return Err(ParityError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "rolling_window".to_string(),
            reason: "rolling_window must be at least 2".to_string(),
        });
    }
    Ok(())
}

fn validate_max_iterations(config: &dyn ConfigPort) -> Result<(), ParityError> {
    let value = parse_present::<i64>(config, "risk_parity", "max_iterations")?
        .unwrap_or(RiskParityConfig::default().max_iterations as i64);
    if value < 1 {
        return Err(ParityError::ConfigInvalid {
            section: "risk_parity".to_string(),
            key: "max_iterations".to_string(),
            reason: "max_iterations must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_tolerance(config: &dyn ConfigPort) -> Result<(), ParityError> {
    let value = parse_present::<f64>(config, "risk_parity", "tolerance")?
        .unwrap_or(RiskParityConfig::default().tolerance);
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(ParityError::ConfigInvalid {
            section: "risk_parity".to_string(),
            key: "tolerance".to_string(),
            reason: "tolerance must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}
