//! Equal risk contribution (risk parity) allocator.
//!
//! Solves `min ½ yᵀΣy - Σ b_i ln y_i` with equal budgets `b_i = 1/N` by cyclical
//! coordinate descent, then normalises `w = y / Σy`. At the optimum every asset
//! carries the same share `w_i (Σw)_i` of portfolio variance. Each coordinate
//! step solves `Σ_ii y_i² + c_i y_i - b_i = 0` with `c_i = Σ_{j≠i} Σ_ij y_j`,
//! whose positive root keeps `y` strictly positive.

use tracing::debug;

use crate::domain::error::ParityError;
use crate::domain::returns::ReturnMatrix;
use crate::domain::weights::Weights;
use crate::ports::allocator_port::AllocatorPort;

pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskParityConfig {
    pub max_iterations: usize,
    /// Convergence threshold on the largest change of a normalised weight
    /// between two sweeps.
    pub tolerance: f64,
}

impl Default for RiskParityConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RiskParityAllocator {
    pub config: RiskParityConfig,
}

impl RiskParityAllocator {
    pub fn new(config: RiskParityConfig) -> Self {
        Self { config }
    }
}

impl AllocatorPort for RiskParityAllocator {
    fn name(&self) -> &str {
        "Risk Parity"
    }

    fn allocate(&self, returns: &ReturnMatrix) -> Result<Weights, ParityError> {
        if returns.row_count() < 2 {
            return Err(ParityError::Optimizer {
                reason: format!(
                    "need at least 2 return rows to estimate covariance, have {}",
                    returns.row_count()
                ),
            });
        }

        let mu = returns.mean_returns();
        let cov = returns.covariance();
        debug!(?mu, "historical mean returns");

        let values = solve_equal_risk_contribution(&cov, &self.config)?;
        Weights::new(returns.tickers.clone(), values)
    }
}

/// Long-only weights with equal risk contributions under `cov`.
pub fn solve_equal_risk_contribution(
    cov: &[Vec<f64>],
    config: &RiskParityConfig,
) -> Result<Vec<f64>, ParityError> {
    let n = cov.len();
    if n == 0 {
        return Err(ParityError::Optimizer {
            reason: "no assets to allocate".into(),
        });
    }
    if cov.iter().any(|row| row.len() != n) {
        return Err(ParityError::Optimizer {
            reason: "covariance matrix is not square".into(),
        });
    }
    if cov.iter().flatten().any(|c| !c.is_finite()) {
        return Err(ParityError::Optimizer {
            reason: "covariance matrix has non-finite entries".into(),
        });
    }
    if let Some(i) = (0..n).find(|&i| cov[i][i] <= 0.0) {
        return Err(ParityError::Optimizer {
            reason: format!("asset {i} has non-positive variance {}", cov[i][i]),
        });
    }

    let budget = 1.0 / n as f64;
    let mut y: Vec<f64> = (0..n).map(|i| (budget / cov[i][i]).sqrt()).collect();
    let mut weights = normalise(&y);

    for iteration in 1..=config.max_iterations {
        for i in 0..n {
            let c: f64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| cov[i][j] * y[j])
                .sum();
            let a = cov[i][i];
            y[i] = (-c + (c * c + 4.0 * a * budget).sqrt()) / (2.0 * a);
        }

        if y.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ParityError::Optimizer {
                reason: format!("solver diverged at iteration {iteration}"),
            });
        }

        let next = normalise(&y);
        let change = next
            .iter()
            .zip(&weights)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        weights = next;

        if change < config.tolerance {
            debug!(iteration, change, "risk parity converged");
            return Ok(weights);
        }
    }

    Err(ParityError::Optimizer {
        reason: format!(
            "risk parity did not converge within {} iterations",
            config.max_iterations
        ),
    })
}

fn normalise(y: &[f64]) -> Vec<f64> {
    let total: f64 = y.iter().sum();
    y.iter().map(|v| v / total).collect()
}
