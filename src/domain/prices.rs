//! Adjusted close price series and the aligned price table.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use crate::domain::error::ParityError;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adj_close: f64,
}

/// Date-indexed table with one column per ticker.
///
/// Dates are the sorted union of every ticker's dates. A ticker without an
/// observation on a given date holds `NaN` in that cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    pub tickers: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<Vec<f64>>,
}

impl PriceTable {
    /// Align per-ticker series on their unified timeline, keeping the ticker
    /// order of `series`.
    pub fn align(series: Vec<(String, Vec<PricePoint>)>) -> Result<Self, ParityError> {
        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|(_, points)| points.iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let date_index: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut rows = vec![vec![f64::NAN; series.len()]; dates.len()];
        let mut tickers = Vec::with_capacity(series.len());

        for (col, (ticker, points)) in series.into_iter().enumerate() {
            for point in &points {
                if !point.adj_close.is_finite() || point.adj_close <= 0.0 {
                    return Err(ParityError::Data {
                        ticker,
                        reason: format!("invalid price {} on {}", point.adj_close, point.date),
                    });
                }
                rows[date_index[&point.date]][col] = point.adj_close;
            }
            tickers.push(ticker);
        }

        Ok(Self {
            tickers,
            dates,
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
