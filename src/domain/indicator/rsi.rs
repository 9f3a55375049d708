//! RSI over the trailing `period` close-to-close deltas.
//!
//! Simple (non-smoothed) averages: avg_gain = gains/period,
//! avg_loss = losses/period, RSI = 100 - 100/(1 + avg_gain/avg_loss).
//! A window with no losses reads as RSI = 100.

use crate::domain::quote::DailyQuote;

/// RSI at `index`, or `None` before `period` deltas exist.
pub fn rsi_at(quotes: &[DailyQuote], index: usize, period: usize) -> Option<f64> {
    if period == 0 || index < period || index >= quotes.len() {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in (index - period + 1)..=index {
        let change = quotes[i].close - quotes[i - 1].close;
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}
