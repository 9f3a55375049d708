//! Open position and completed trade records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single open position. At most one exists per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_price: f64,
    pub quantity: i64,
    pub entry_date: NaiveDate,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    /// Percent return at `price` relative to the entry.
    pub fn return_percent(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price * 100.0
    }

    /// Absolute profit/loss at `price`.
    pub fn profit_loss(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.quantity as f64
    }
}

/// Why a position was closed. Stop-loss beats take-profit beats sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Sell,
    StopLoss,
    TakeProfit,
}

/// Immutable record of a completed entry/exit pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: i64,
    pub profit_loss: f64,
    pub return_percent: f64,
    pub exit_reason: ExitReason,
}
