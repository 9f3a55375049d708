//! Backtest engine: single-pass, single-position simulation driver.
//!
//! One engine value owns the full per-run state (cash, open position, trade
//! log, equity/date sequences) and is constructed fresh per run, so
//! concurrent runs cannot interfere. Each day either the entry branch (flat)
//! or the exit branch (open) runs, never both; on the exit side stop-loss is
//! checked before take-profit before the generic sell group.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::condition::ConditionGroup;
use crate::domain::error::KabusimError;
use crate::domain::evaluator::evaluate_group;
use crate::domain::metrics::Metrics;
use crate::domain::position::{ExitReason, Position, Trade};
use crate::domain::quote::DailyQuote;
use crate::domain::validation::validate_params;

#[derive(Debug, Clone)]
pub struct EngineParams {
    pub initial_cash: f64,
    /// Percent of initial cash a single entry may commit, in (0, 100].
    pub max_position_pct: f64,
    pub buy: ConditionGroup,
    pub sell: ConditionGroup,
    pub take_profit: ConditionGroup,
    pub stop_loss: ConditionGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub initial_cash: f64,
    pub final_equity: f64,
    pub total_return: f64,
    /// None when the run produced no trades.
    pub win_rate: Option<f64>,
    pub max_drawdown: f64,
    /// None when the equity curve has no volatility or fewer than two points.
    pub sharpe_ratio: Option<f64>,
    pub trades: Vec<Trade>,
    pub equity: Vec<f64>,
    pub dates: Vec<NaiveDate>,
}

/// Validate parameters, then simulate. The only entry point callers need.
pub fn run_backtest(
    quotes: &[DailyQuote],
    params: &EngineParams,
) -> Result<BacktestResult, KabusimError> {
    validate_params(quotes, params)?;
    Ok(BacktestEngine::new(quotes, params).run())
}

pub struct BacktestEngine<'a> {
    quotes: &'a [DailyQuote],
    params: &'a EngineParams,
    cash: f64,
    position: Option<Position>,
    trades: Vec<Trade>,
    equity: Vec<f64>,
    dates: Vec<NaiveDate>,
}

impl<'a> BacktestEngine<'a> {
    pub fn new(quotes: &'a [DailyQuote], params: &'a EngineParams) -> Self {
        Self {
            quotes,
            params,
            cash: params.initial_cash,
            position: None,
            trades: Vec::new(),
            equity: Vec::with_capacity(quotes.len()),
            dates: Vec::with_capacity(quotes.len()),
        }
    }

    pub fn run(mut self) -> BacktestResult {
        for i in 0..self.quotes.len() {
            self.process_day(i);
            self.record_equity(i);
        }

        // Still holding at the end of the series: settle at the last close.
        if self.position.is_some() {
            self.close_position(self.quotes.len() - 1, ExitReason::Sell);
        }

        let final_equity = self
            .equity
            .last()
            .copied()
            .unwrap_or(self.params.initial_cash);
        let metrics = Metrics::compute(self.params.initial_cash, &self.equity, &self.trades);

        BacktestResult {
            initial_cash: self.params.initial_cash,
            final_equity,
            total_return: metrics.total_return,
            win_rate: metrics.win_rate,
            max_drawdown: metrics.max_drawdown,
            sharpe_ratio: metrics.sharpe_ratio,
            trades: self.trades,
            equity: self.equity,
            dates: self.dates,
        }
    }

    fn process_day(&mut self, index: usize) {
        if self.position.is_none() {
            if evaluate_group(&self.params.buy, self.quotes, index, None) {
                self.try_open(index);
            }
        } else {
            let position = self.position.as_ref();
            if evaluate_group(&self.params.stop_loss, self.quotes, index, position) {
                self.close_position(index, ExitReason::StopLoss);
            } else if evaluate_group(&self.params.take_profit, self.quotes, index, position) {
                self.close_position(index, ExitReason::TakeProfit);
            } else if evaluate_group(&self.params.sell, self.quotes, index, position) {
                self.close_position(index, ExitReason::Sell);
            }
        }
    }

    /// Size an entry at the day's close. A quantity of zero (insufficient
    /// funds) silently stays flat.
    fn try_open(&mut self, index: usize) {
        let quote = &self.quotes[index];
        let close = quote.close;

        let max_quantity =
            (self.params.initial_cash * self.params.max_position_pct / 100.0 / close).floor();
        let quantity = ((self.cash / close).floor()).min(max_quantity) as i64;

        if quantity > 0 {
            self.cash -= quantity as f64 * close;
            debug!(
                "open {} x {} @ {} (cash {:.2})",
                quantity, quote.date, close, self.cash
            );
            self.position = Some(Position {
                entry_price: close,
                quantity,
                entry_date: quote.date,
            });
        }
    }

    fn close_position(&mut self, index: usize, exit_reason: ExitReason) {
        let Some(position) = self.position.take() else {
            return;
        };
        let quote = &self.quotes[index];
        let exit_price = quote.close;

        let profit_loss = position.profit_loss(exit_price);
        let return_percent = position.return_percent(exit_price);

        self.cash += exit_price * position.quantity as f64;
        debug!(
            "close {} x {} @ {} pnl {:.2} ({:?})",
            position.quantity, quote.date, exit_price, profit_loss, exit_reason
        );

        self.trades.push(Trade {
            entry_date: position.entry_date,
            exit_date: quote.date,
            entry_price: position.entry_price,
            exit_price,
            quantity: position.quantity,
            profit_loss,
            return_percent,
            exit_reason,
        });
    }

    /// Equity = cash + mark-to-market value of the open position, recorded
    /// every day whether or not a transition occurred.
    fn record_equity(&mut self, index: usize) {
        let quote = &self.quotes[index];
        let mut equity = self.cash;
        if let Some(position) = &self.position {
            equity += position.market_value(quote.close);
        }
        self.equity.push(equity);
        self.dates.push(quote.date);
    }
}
