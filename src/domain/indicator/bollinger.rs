//! Bollinger bands: SMA ± multiplier × population standard deviation.

use crate::domain::quote::{DailyQuote, PriceType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bands ending at `index`, or `None` while the window is incomplete.
pub fn bands_at(
    quotes: &[DailyQuote],
    index: usize,
    period: usize,
    multiplier: f64,
    price_type: PriceType,
) -> Option<Bands> {
    if period == 0 || index >= quotes.len() || index + 1 < period {
        return None;
    }
    let start = index + 1 - period;
    let window = &quotes[start..=index];

    let middle: f64 = window.iter().map(|q| q.price(price_type)).sum::<f64>() / period as f64;
    let variance: f64 = window
        .iter()
        .map(|q| {
            let diff = q.price(price_type) - middle;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    let std_dev = variance.sqrt();

    Some(Bands {
        upper: middle + multiplier * std_dev,
        middle,
        lower: middle - multiplier * std_dev,
    })
}
