//! Quote data access port trait.

use chrono::NaiveDate;

use crate::domain::error::KabusimError;
use crate::domain::quote::DailyQuote;

/// Source of daily observation series. Upstream-provider fetching lives
/// behind this trait; the engine itself never performs I/O.
pub trait QuoteDataPort {
    /// Quotes for `code` within `[start_date, end_date]`, ascending by date.
    fn fetch_daily_quotes(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailyQuote>, KabusimError>;

    /// First date, last date and observation count, or None when no data.
    fn data_range(&self, code: &str) -> Result<Option<(NaiveDate, NaiveDate, usize)>, KabusimError>;
}
