//! The analysis pipeline: acquisition, returns, weights, evaluation.
//!
//! Each stage is a plain function so it can be driven with fixtures. The
//! presentation stage is left to [`crate::ports::report_port::ReportPort`]
//! implementations that consume the finished [`AnalysisReport`].

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::error::ParityError;
use crate::domain::metrics::{self, Metrics, ROLLING_WINDOW, TRADING_DAYS_PER_YEAR};
use crate::domain::portfolio::{self, PortfolioReturns};
use crate::domain::prices::PriceTable;
use crate::domain::returns::{self, ReturnMatrix};
use crate::domain::universe::Universe;
use crate::domain::weights::{equal_weights, Weights};
use crate::ports::allocator_port::AllocatorPort;
use crate::ports::data_port::DataPort;

pub const EQUAL_WEIGHT_NAME: &str = "Equally Weighted";
pub const MIN_RETURN_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trading_days: f64,
    pub rolling_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tickers: Universe::default().tickers,
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
            trading_days: TRADING_DAYS_PER_YEAR,
            rolling_window: ROLLING_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResult {
    pub name: String,
    pub weights: Weights,
    pub risk_contributions: Vec<f64>,
    pub returns: PortfolioReturns,
    pub growth: Vec<f64>,
    pub rolling_sharpe: Vec<f64>,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub observations: usize,
    pub rolling_window: usize,
    pub strategies: Vec<StrategyResult>,
}

impl AnalysisReport {
    pub fn strategy(&self, name: &str) -> Option<&StrategyResult> {
        self.strategies.iter().find(|s| s.name == name)
    }
}

/// Stage 1: fetch every ticker and align the series on one date index.
pub fn acquire_prices(
    data_port: &dyn DataPort,
    tickers: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<PriceTable, ParityError> {
    info!(
        source = data_port.source_name(),
        tickers = tickers.len(),
        %start_date,
        %end_date,
        "fetching adjusted close prices"
    );

    let mut series = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let points = data_port.fetch_adjusted_close(ticker, start_date, end_date)?;
        if points.is_empty() {
            return Err(ParityError::NoData {
                ticker: ticker.clone(),
                start: start_date,
                end: end_date,
            });
        }
        info!(%ticker, rows = points.len(), "fetched");
        series.push((ticker.clone(), points));
    }

    let table = PriceTable::align(series)?;
    if let (Some(first), Some(last)) = (table.first_date(), table.last_date()) {
        info!(rows = table.row_count(), %first, %last, "aligned price table");
    }
    Ok(table)
}

/// Stage 2: simple returns, rejecting matrices too short to evaluate.
pub fn derive_returns(prices: &PriceTable) -> Result<ReturnMatrix, ParityError> {
    let returns = returns::compute_returns(prices);
    let dropped = prices.row_count().saturating_sub(1) - returns.row_count();
    if dropped > 0 {
        warn!(dropped, "dropped return rows before every ticker had a price");
    }
    if returns.row_count() < MIN_RETURN_ROWS {
        return Err(ParityError::InsufficientData {
            rows: returns.row_count(),
            minimum: MIN_RETURN_ROWS,
        });
    }
    info!(rows = returns.row_count(), "computed daily returns");
    Ok(returns)
}

/// Stage 3: equal weights plus the allocator's weights, both validated.
pub fn generate_weights(
    returns: &ReturnMatrix,
    allocator: &dyn AllocatorPort,
) -> Result<Vec<(String, Weights)>, ParityError> {
    let equal = equal_weights(&returns.tickers);
    equal.validate(EQUAL_WEIGHT_NAME)?;

    let allocated = allocator.allocate(returns)?;
    allocated.validate(allocator.name())?;
    if allocated.tickers != returns.tickers {
        return Err(ParityError::InvalidWeights {
            strategy: allocator.name().to_string(),
            reason: "tickers do not match the return matrix".into(),
        });
    }

    Ok(vec![
        (EQUAL_WEIGHT_NAME.to_string(), equal),
        (allocator.name().to_string(), allocated),
    ])
}

/// Stage 4: project returns through `weights` and derive every statistic.
pub fn evaluate_strategy(
    name: &str,
    weights: Weights,
    returns: &ReturnMatrix,
    covariance: &[Vec<f64>],
    config: &AnalysisConfig,
) -> Result<StrategyResult, ParityError> {
    let portfolio_returns = portfolio::project(returns, &weights)?;
    let metrics = Metrics::compute(&portfolio_returns.values, config.trading_days);

    Ok(StrategyResult {
        name: name.to_string(),
        risk_contributions: weights.risk_contributions(covariance),
        weights,
        growth: metrics::growth_factors(&portfolio_returns.values),
        rolling_sharpe: metrics::rolling_sharpe(
            &portfolio_returns.values,
            config.rolling_window,
            config.trading_days,
        ),
        returns: portfolio_returns,
        metrics,
    })
}

/// Run stages 1-4 and collect the results for presentation.
pub fn run_analysis(
    data_port: &dyn DataPort,
    allocator: &dyn AllocatorPort,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, ParityError> {
    let prices = acquire_prices(data_port, &config.tickers, config.start_date, config.end_date)?;
    let returns = derive_returns(&prices)?;

    info!(allocator = allocator.name(), "generating weights");
    let weight_sets = generate_weights(&returns, allocator)?;

    let covariance = returns.covariance();
    let strategies = weight_sets
        .into_iter()
        .map(|(name, weights)| evaluate_strategy(&name, weights, &returns, &covariance, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisReport {
        tickers: returns.tickers.clone(),
        start_date: config.start_date,
        end_date: config.end_date,
        observations: returns.row_count(),
        rolling_window: config.rolling_window,
        strategies,
    })
}
