//! Simple and exponential moving averages of a chosen price type.
//!
//! EMA: k = 2/(n+1), seeded with the SMA of the first n observations, then
//! EMA[i] = P[i]*k + EMA[i-1]*(1-k).

use crate::domain::quote::{DailyQuote, PriceType};

/// Simple moving average ending at `index`, or `None` while the window is
/// incomplete.
pub fn sma_at(
    quotes: &[DailyQuote],
    index: usize,
    period: usize,
    price_type: PriceType,
) -> Option<f64> {
    if period == 0 || index >= quotes.len() || index + 1 < period {
        return None;
    }
    let start = index + 1 - period;
    let sum: f64 = quotes[start..=index]
        .iter()
        .map(|q| q.price(price_type))
        .sum();
    Some(sum / period as f64)
}

/// Exponential moving average ending at `index`, or `None` while the seed
/// window is incomplete.
pub fn ema_at(
    quotes: &[DailyQuote],
    index: usize,
    period: usize,
    price_type: PriceType,
) -> Option<f64> {
    if period == 0 || index >= quotes.len() || index + 1 < period {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = sma_at(quotes, period - 1, period, price_type)?;
    for q in &quotes[period..=index] {
        ema = q.price(price_type) * k + ema * (1.0 - k);
    }
    Some(ema)
}
