//! Portfolio return series: returns projected through a weight vector.

use chrono::NaiveDate;

use crate::domain::error::ParityError;
use crate::domain::returns::ReturnMatrix;
use crate::domain::stats;
use crate::domain::weights::Weights;

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReturns {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl PortfolioReturns {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-date dot product of the return matrix with the weights.
///
/// Weights must name the same tickers in the same order as the matrix.
pub fn project(returns: &ReturnMatrix, weights: &Weights) -> Result<PortfolioReturns, ParityError> {
    if weights.values.len() != returns.asset_count() {
        return Err(ParityError::DimensionMismatch {
            expected: returns.asset_count(),
            actual: weights.values.len(),
        });
    }
    if let Some((expected, actual)) = returns
        .tickers
        .iter()
        .zip(&weights.tickers)
        .find(|(a, b)| a != b)
    {
        return Err(ParityError::InvalidWeights {
            strategy: "projection".into(),
            reason: format!("expected ticker {expected}, found {actual}"),
        });
    }

    Ok(PortfolioReturns {
        dates: returns.dates.clone(),
        values: returns
            .rows
            .iter()
            .map(|row| stats::dot(row, &weights.values))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weights::equal_weights;
    use approx::assert_relative_eq;

    fn matrix() -> ReturnMatrix {
        ReturnMatrix {
            tickers: vec!["A".into(), "B".into()],
            dates: vec![
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ],
            rows: vec![vec![0.02, 0.04], vec![-0.01, 0.01]],
        }
    }

    #[test]
    fn project_equal_weights_averages_returns() {
        let returns = matrix();
        let weights = equal_weights(&returns.tickers);
        let portfolio = project(&returns, &weights).unwrap();

        assert_eq!(portfolio.len(), 2);
        assert_eq!(portfolio.dates, returns.dates);
        assert_relative_eq!(portfolio.values[0], 0.03, epsilon = 1e-12);
        assert_relative_eq!(portfolio.values[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn project_single_asset_is_identity() {
        let returns = ReturnMatrix {
            tickers: vec!["X".into()],
            dates: vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(); 3],
            rows: vec![vec![0.01], vec![-0.02], vec![0.03]],
        };
        let weights = Weights::new(vec!["X".into()], vec![1.0]).unwrap();
        let portfolio = project(&returns, &weights).unwrap();
        assert_eq!(portfolio.values, vec![0.01, -0.02, 0.03]);
    }

    #[test]
    fn project_rejects_wrong_length() {
        let weights = Weights::new(vec!["A".into()], vec![1.0]).unwrap();
        assert!(matches!(
            project(&matrix(), &weights),
            Err(ParityError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn project_rejects_misaligned_tickers() {
        let weights = Weights::new(vec!["B".into(), "A".into()], vec![0.5, 0.5]).unwrap();
        assert!(matches!(
            project(&matrix(), &weights),
            Err(ParityError::InvalidWeights { .. })
        ));
    }
}
