//! Time-reference resolution: a relative reference (current, N days/weeks/
//! months/quarters/years ago) plus the current simulation index yields a
//! concrete index into the observation series.
//!
//! Days and weeks are pure index arithmetic (weeks = 7 trading days);
//! months, quarters and years subtract calendar months from the current
//! date and scan backward for the last observation on or before the target.
//! The asymmetry is inherited behavior and kept as-is.

use chrono::Months;

use crate::domain::quote::DailyQuote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeReference {
    Current,
    Days(usize),
    Weeks(usize),
    Months(usize),
    Quarters(usize),
    Years(usize),
}

/// Resolve a time reference to a historical index. Never exceeds the series
/// bounds; degrades to index 0 when the target predates the series.
pub fn resolve_index(quotes: &[DailyQuote], current: usize, reference: TimeReference) -> usize {
    match reference {
        TimeReference::Current => current,
        TimeReference::Days(n) => current.saturating_sub(n),
        TimeReference::Weeks(n) => current.saturating_sub(n * 7),
        TimeReference::Months(n) => resolve_calendar(quotes, current, n as u32),
        TimeReference::Quarters(n) => resolve_calendar(quotes, current, n as u32 * 3),
        TimeReference::Years(n) => resolve_calendar(quotes, current, n as u32 * 12),
    }
}

fn resolve_calendar(quotes: &[DailyQuote], current: usize, months: u32) -> usize {
    if months == 0 {
        return current;
    }
    let target = match quotes[current].date.checked_sub_months(Months::new(months)) {
        Some(d) => d,
        None => return 0,
    };
    for i in (0..=current).rev() {
        if quotes[i].date <= target {
            return i;
        }
    }
    0
}
