//! Yahoo Finance data adapter.
//!
//! Pulls daily quotes through `yahoo_finance_api` on a current-thread tokio
//! runtime and keeps the adjusted close.

use crate::domain::error::ParityError;
use crate::domain::prices::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::{Datelike, NaiveDate};
use time::{Month, OffsetDateTime};
use tokio::runtime::Runtime;
use yahoo_finance_api as yahoo;

pub struct YahooAdapter {
    runtime: Runtime,
    connector: yahoo::YahooConnector,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, ParityError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let connector = yahoo::YahooConnector::new().map_err(|e| ParityError::Data {
            ticker: "*".to_string(),
            reason: format!("failed to create Yahoo connector: {e}"),
        })?;
        Ok(Self { runtime, connector })
    }
}

fn to_offset_datetime(date: NaiveDate, ticker: &str) -> Result<OffsetDateTime, ParityError> {
    let err = |reason: String| ParityError::Data {
        ticker: ticker.to_string(),
        reason,
    };
    let month = Month::try_from(date.month() as u8).map_err(|e| err(e.to_string()))?;
    let day = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map_err(|e| err(e.to_string()))?;
    Ok(day.midnight().assume_utc())
}

impl DataPort for YahooAdapter {
    fn fetch_adjusted_close(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, ParityError> {
        let start = to_offset_datetime(start_date, ticker)?;
        // The chart API treats the end bound as exclusive.
        let end = to_offset_datetime(end_date, ticker)? + time::Duration::days(1);

        let response = self
            .runtime
            .block_on(self.connector.get_quote_history(ticker, start, end))
            .map_err(|e| ParityError::Data {
                ticker: ticker.to_string(),
                reason: format!("quote history request failed: {e}"),
            })?;
        let quotes = response.quotes().map_err(|e| ParityError::Data {
            ticker: ticker.to_string(),
            reason: format!("malformed quote response: {e}"),
        })?;

        let mut points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = chrono::DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                (date >= start_date && date <= end_date).then_some(PricePoint {
                    date,
                    adj_close: q.adjclose,
                })
            })
            .collect();

        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Ok(points)
    }

    fn source_name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_calendar_dates_to_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2018, 1, 2).unwrap();
        let odt = to_offset_datetime(date, "AAPL").unwrap();
        assert_eq!(odt.year(), 2018);
        assert_eq!(odt.month(), Month::January);
        assert_eq!(odt.day(), 2);
        assert_eq!(odt.hour(), 0);
        assert_eq!(odt.offset(), time::UtcOffset::UTC);
    }
}
