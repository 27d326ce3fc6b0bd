//! Portfolio weight vectors.

use crate::domain::error::ParityError;
use crate::domain::stats;

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    pub tickers: Vec<String>,
    pub values: Vec<f64>,
}

impl Weights {
    pub fn new(tickers: Vec<String>, values: Vec<f64>) -> Result<Self, ParityError> {
        if tickers.len() != values.len() {
            return Err(ParityError::DimensionMismatch {
                expected: tickers.len(),
                actual: values.len(),
            });
        }
        Ok(Self { tickers, values })
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Check that weights are non-negative, finite and sum to one.
    pub fn validate(&self, strategy: &str) -> Result<(), ParityError> {
        if let Some((ticker, w)) = self.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(ParityError::InvalidWeights {
                strategy: strategy.to_string(),
                reason: format!("weight for {ticker} is {w}"),
            });
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ParityError::InvalidWeights {
                strategy: strategy.to_string(),
                reason: format!("weights sum to {sum}"),
            });
        }
        Ok(())
    }

    /// Share of portfolio variance carried by each asset: `w_i (Σw)_i / wᵀΣw`.
    pub fn risk_contributions(&self, covariance: &[Vec<f64>]) -> Vec<f64> {
        let sigma_w = stats::mat_vec(covariance, &self.values);
        let variance = stats::dot(&self.values, &sigma_w);
        self.values
            .iter()
            .zip(&sigma_w)
            .map(|(w, sw)| {
                if variance > 0.0 {
                    w * sw / variance
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}

/// `1/N` for each of the N tickers.
pub fn equal_weights(tickers: &[String]) -> Weights {
    let n = tickers.len();
    Weights {
        tickers: tickers.to_vec(),
        values: vec![1.0 / n as f64; n],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tickers(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("T{i}")).collect()
    }

    #[test]
    fn equal_weights_are_exactly_one_over_n() {
        let weights = equal_weights(&tickers(8));
        assert_eq!(weights.values.len(), 8);
        assert!(weights.values.iter().all(|&w| w == 1.0 / 8.0));
        assert!(weights.validate("Equally Weighted").is_ok());
    }

    #[test]
    fn equal_weights_for_awkward_n_still_validate() {
        let weights = equal_weights(&tickers(7));
        assert_relative_eq!(weights.sum(), 1.0, epsilon = 1e-12);
        assert!(weights.validate("Equally Weighted").is_ok());
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let result = Weights::new(tickers(2), vec![1.0]);
        assert!(matches!(
            result,
            Err(ParityError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let weights = Weights::new(tickers(2), vec![1.2, -0.2]).unwrap();
        assert!(matches!(
            weights.validate("x"),
            Err(ParityError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_sum() {
        let weights = Weights::new(tickers(2), vec![0.5, 0.4]).unwrap();
        assert!(weights.validate("x").is_err());
    }

    #[test]
    fn iter_pairs_tickers_with_values() {
        let weights = Weights::new(tickers(2), vec![0.3, 0.7]).unwrap();
        let pairs: Vec<(&str, f64)> = weights.iter().collect();
        assert_eq!(pairs, vec![("T0", 0.3), ("T1", 0.7)]);
    }

    #[test]
    fn risk_contributions_sum_to_one() {
        let cov = vec![vec![0.04, 0.006], vec![0.006, 0.01]];
        let weights = Weights::new(tickers(2), vec![0.4, 0.6]).unwrap();
        let rc = weights.risk_contributions(&cov);
        assert_relative_eq!(rc.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn risk_contributions_undefined_for_zero_variance() {
        let cov = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
        let weights = equal_weights(&tickers(2));
        assert!(weights.risk_contributions(&cov).iter().all(|v| v.is_nan()));
    }
}
