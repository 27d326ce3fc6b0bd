//! Ticker universe.
//!
//! Parses ticker lists from configuration. The order of the parsed list is the
//! column order of every price table, return matrix and weight vector in a run.

use std::collections::HashSet;

pub const DEFAULT_TICKERS: [&str; 8] = ["AAPL", "MSFT", "AMZN", "JNJ", "JPM", "XOM", "PG", "GOOGL"];

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub tickers: Vec<String>,
}

impl Universe {
    pub fn new(tickers: Vec<String>) -> Self {
        Self { tickers }
    }

    pub fn count(&self) -> usize {
        self.tickers.len()
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new(DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),

    #[error("ticker list is empty")]
    Empty,
}

pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    if input.trim().is_empty() {
        return Err(UniverseError::Empty);
    }

    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tickers_basic() {
        let result = parse_tickers("AAPL,MSFT,AMZN").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT", "AMZN"]);
    }

    #[test]
    fn parse_tickers_trims_and_uppercases() {
        let result = parse_tickers("  aapl , Msft ,jnj").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT", "JNJ"]);
    }

    #[test]
    fn parse_tickers_keeps_order() {
        let result = parse_tickers("XOM,AAPL,PG").unwrap();
        assert_eq!(result, vec!["XOM", "AAPL", "PG"]);
    }

    #[test]
    fn parse_tickers_empty_token() {
        let result = parse_tickers("AAPL,,MSFT");
        assert!(matches!(result, Err(UniverseError::EmptyToken)));
    }

    #[test]
    fn parse_tickers_duplicate() {
        let result = parse_tickers("AAPL,msft,aapl");
        assert!(matches!(result, Err(UniverseError::DuplicateTicker(s)) if s == "AAPL"));
    }

    #[test]
    fn parse_tickers_blank_input() {
        assert!(matches!(parse_tickers("   "), Err(UniverseError::Empty)));
    }

    #[test]
    fn default_universe_has_eight_tickers() {
        let universe = Universe::default();
        assert_eq!(universe.count(), 8);
        assert_eq!(universe.tickers[0], "AAPL");
        assert_eq!(universe.tickers[7], "GOOGL");
    }
}
