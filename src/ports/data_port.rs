//! Price data access port trait.

use crate::domain::error::ParityError;
use crate::domain::prices::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Adjusted close prices for `ticker` on dates in `[start_date, end_date]`,
    /// sorted by date. An empty result is reported by the pipeline as missing
    /// data for that ticker.
    fn fetch_adjusted_close(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, ParityError>;

    fn source_name(&self) -> &str;
}
