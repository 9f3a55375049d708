//! Summary statistics over a completed run's equity curve and trade log.
//!
//! Degenerate cases surface as `None` rather than NaN: win rate with zero
//! trades, Sharpe with zero return variance or fewer than two equity points.

use crate::domain::position::Trade;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub win_rate: Option<f64>,
    pub max_drawdown: f64,
    pub sharpe_ratio: Option<f64>,
}

impl Metrics {
    pub fn compute(initial_cash: f64, equity: &[f64], trades: &[Trade]) -> Self {
        let final_equity = equity.last().copied().unwrap_or(initial_cash);
        let total_return = (final_equity - initial_cash) / initial_cash * 100.0;

        let win_rate = if trades.is_empty() {
            None
        } else {
            let wins = trades.iter().filter(|t| t.profit_loss > 0.0).count();
            Some(wins as f64 / trades.len() as f64 * 100.0)
        };

        Metrics {
            total_return,
            win_rate,
            max_drawdown: compute_max_drawdown(equity),
            sharpe_ratio: compute_sharpe(equity),
        }
    }
}

/// Largest peak-to-trough decline, as a percent of the running peak.
fn compute_max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;
    for &value in equity {
        if value > peak {
            peak = value;
        }
        let drawdown = (peak - value) / peak * 100.0;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }
    max_drawdown
}

/// Annualized Sharpe ratio over daily returns, population standard deviation.
fn compute_sharpe(equity: &[f64]) -> Option<f64> {
    if equity.len() < 2 {
        return None;
    }

    let returns: Vec<f64> = equity
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return None;
    }

    Some(mean * TRADING_DAYS_PER_YEAR / (std_dev * TRADING_DAYS_PER_YEAR.sqrt()))
}
