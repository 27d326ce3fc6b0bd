//! Performance metrics for a portfolio return series.

use crate::domain::stats;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const ROLLING_WINDOW: usize = 252;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub cumulative_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

impl Metrics {
    pub fn compute(returns: &[f64], trading_days: f64) -> Self {
        let cumulative_return = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;
        let annualized_return = stats::mean(returns) * trading_days;
        let annualized_volatility = stats::sample_std(returns) * trading_days.sqrt();

        Metrics {
            cumulative_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio: sharpe(annualized_return, annualized_volatility),
            max_drawdown: max_drawdown(returns),
        }
    }

    /// Rows of the console table: label and value, in display order.
    pub fn rows(&self) -> [(&'static str, f64); 5] {
        [
            ("Cumulative Return", self.cumulative_return),
            ("Annualized Return", self.annualized_return),
            ("Annualized Volatility", self.annualized_volatility),
            ("Sharpe Ratio", self.sharpe_ratio),
            ("Maximum Drawdown", self.max_drawdown),
        ]
    }
}

/// `NaN` unless volatility is strictly positive.
fn sharpe(annualized_return: f64, annualized_volatility: f64) -> f64 {
    if annualized_volatility > 0.0 {
        annualized_return / annualized_volatility
    } else {
        f64::NAN
    }
}

/// Cumulative product of `(1 + r)`.
pub fn growth_factors(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0_f64, |acc, r| {
            *acc *= 1.0 + r;
            Some(*acc)
        })
        .collect()
}

/// Largest gap between the running peak of the growth factor and the growth
/// factor itself, in growth-factor units (not a fraction of the peak).
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for g in growth_factors(returns) {
        peak = peak.max(g);
        max_dd = max_dd.max(peak - g);
    }

    max_dd
}

/// Rolling annualised Sharpe: rolling mean over rolling sample stddev, times
/// `sqrt(trading_days)`. The first `window - 1` entries are `NaN`, as is any
/// window with zero dispersion.
pub fn rolling_sharpe(returns: &[f64], window: usize, trading_days: f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; returns.len()];
    if window == 0 {
        return out;
    }

    for end in window..=returns.len() {
        let slice = &returns[end - window..end];
        let sd = stats::sample_std(slice);
        if sd > 0.0 {
            out[end - 1] = stats::mean(slice) / sd * trading_days.sqrt();
        }
    }

    out
}
