//! Simple daily returns derived from a price table.

use chrono::NaiveDate;

use crate::domain::prices::PriceTable;
use crate::domain::stats;

/// Return matrix aligned with the tickers of the price table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMatrix {
    pub tickers: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<Vec<f64>>,
}

impl ReturnMatrix {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn asset_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn mean_returns(&self) -> Vec<f64> {
        stats::column_means(&self.rows, self.asset_count())
    }

    pub fn covariance(&self) -> Vec<Vec<f64>> {
        stats::covariance_matrix(&self.rows, self.asset_count())
    }
}

/// `r[t] = p[t] / p[t-1] - 1` for every ticker.
///
/// A missing price carries the ticker's last known price forward, so a gap
/// day has a zero return and the next day is measured against the carried
/// price. The first row has no prior observation and is dropped, as is any
/// leading row before some ticker's first price.
pub fn compute_returns(prices: &PriceTable) -> ReturnMatrix {
    let mut dates = Vec::with_capacity(prices.row_count().saturating_sub(1));
    let mut rows = Vec::with_capacity(prices.row_count().saturating_sub(1));
    let mut last: Vec<Option<f64>> = vec![None; prices.tickers.len()];

    for (t, prices_row) in prices.rows.iter().enumerate() {
        let previous = last.clone();
        for (slot, price) in last.iter_mut().zip(prices_row) {
            if price.is_finite() {
                *slot = Some(*price);
            }
        }
        if t == 0 {
            continue;
        }

        let row: Option<Vec<f64>> = last
            .iter()
            .zip(&previous)
            .map(|(curr, prev)| Some((*curr)? / (*prev)? - 1.0))
            .collect();

        if let Some(row) = row {
            dates.push(prices.dates[t]);
            rows.push(row);
        }
    }

    ReturnMatrix {
        tickers: prices.tickers.clone(),
        dates,
        rows,
    }
}
