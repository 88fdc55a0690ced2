//! Price history access port.

use crate::domain::error::TascoreError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Fetch daily bars for an instrument, optionally bounded by date.
    /// `None` bounds mean "from the start" / "to the end" of what the
    /// source holds.
    fn fetch_bars(
        &self,
        code: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, TascoreError>;

    fn list_codes(&self) -> Result<Vec<String>, TascoreError>;
}
