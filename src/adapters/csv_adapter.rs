//! CSV directory data adapter.
//!
//! One file per ticker, `<TICKER>.csv`, with a header row naming a date column
//! and an adjusted close column.

use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::ParityError;
use crate::domain::prices::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const DATE_COLUMNS: &[&str] = &["date", "Date"];
const PRICE_COLUMNS: &[&str] = &["adj_close", "Adj Close", "adjclose", "close", "Close"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h.trim() == *name))
}

impl DataPort for CsvAdapter {
    fn fetch_adjusted_close(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, ParityError> {
        let data_err = |reason: String| ParityError::Data {
            ticker: ticker.to_string(),
            reason,
        };

        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_err(format!("CSV header error: {}", e)))?
            .clone();

        let date_col = find_column(&headers, DATE_COLUMNS)
            .ok_or_else(|| data_err("missing date column".into()))?;
        let price_col = find_column(&headers, PRICE_COLUMNS)
            .ok_or_else(|| data_err("missing adjusted close column".into()))?;

        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| data_err("missing date value".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
                .map_err(|e| data_err(format!("invalid date '{}': {}", date_str, e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            let adj_close: f64 = record
                .get(price_col)
                .ok_or_else(|| data_err("missing price value".into()))?
                .trim()
                .parse()
                .map_err(|e| data_err(format!("invalid price on {}: {}", date, e)))?;

            points.push(PricePoint { date, adj_close });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }

    fn source_name(&self) -> &str {
        "csv"
    }
}
