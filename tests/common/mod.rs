#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use parity::domain::error::ParityError;
pub use parity::domain::prices::PricePoint;
use parity::domain::returns::ReturnMatrix;
use parity::domain::weights::Weights;
use parity::ports::allocator_port::AllocatorPort;
use parity::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_adjusted_close(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, ParityError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ParityError::Data {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}

/// Allocator returning a fixed weight vector regardless of the returns.
pub struct FixedWeightAllocator {
    pub name: String,
    pub values: Vec<f64>,
}

impl FixedWeightAllocator {
    pub fn new(name: &str, values: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }
}

impl AllocatorPort for FixedWeightAllocator {
    fn name(&self) -> &str {
        &self.name
    }

    fn allocate(&self, returns: &ReturnMatrix) -> Result<Weights, ParityError> {
        Weights::new(returns.tickers.clone(), self.values.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `n` consecutive weekdays starting at `start` (or the next weekday).
pub fn business_days(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n);
    let mut d = start;
    while dates.len() < n {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(d);
        }
        d = d.succ_opt().unwrap();
    }
    dates
}

pub fn price_series(dates: &[NaiveDate], prices: &[f64]) -> Vec<PricePoint> {
    dates
        .iter()
        .zip(prices)
        .map(|(&date, &adj_close)| PricePoint { date, adj_close })
        .collect()
}

/// Prices starting at `start` and compounding `returns`.
pub fn compound_prices(start: f64, returns: &[f64]) -> Vec<f64> {
    let mut prices = Vec::with_capacity(returns.len() + 1);
    prices.push(start);
    for r in returns {
        let last = *prices.last().unwrap();
        prices.push(last * (1.0 + r));
    }
    prices
}

/// Deterministic, non-degenerate daily returns for asset `k`.
pub fn synthetic_returns(k: usize, n: usize, volatility: f64) -> Vec<f64> {
    let phase = k as f64 * 0.9;
    (0..n)
        .map(|i| {
            let t = i as f64;
            let common = (0.37 * t).sin();
            let own = (1.3 * t + phase).sin() + 0.5 * (0.71 * t * (k as f64 + 1.0)).cos();
            0.0004 + volatility * (0.4 * common + 0.6 * own)
        })
        .collect()
}

/// Mock port holding one synthetic series per ticker with the given volatilities.
pub fn synthetic_port(tickers: &[&str], volatilities: &[f64], days: usize) -> MockDataPort {
    let dates = business_days(date(2020, 1, 1), days);
    tickers
        .iter()
        .zip(volatilities)
        .enumerate()
        .fold(MockDataPort::new(), |port, (k, (ticker, vol))| {
            let prices = compound_prices(100.0, &synthetic_returns(k, days - 1, *vol));
            port.with_prices(ticker, price_series(&dates, &prices))
        })
}

pub fn write_price_csv(dir: &Path, ticker: &str, points: &[PricePoint]) {
    let mut content = String::from("date,adj_close\n");
    for p in points {
        content.push_str(&format!("{},{}\n", p.date, p.adj_close));
    }
    fs::write(dir.join(format!("{ticker}.csv")), content).unwrap();
}

/// `ExitCode` has no `PartialEq`; compare through its debug form.
pub fn assert_exit(actual: std::process::ExitCode, expected: u8) {
    assert_eq!(
        format!("{actual:?}"),
        format!("{:?}", std::process::ExitCode::from(expected))
    );
}
