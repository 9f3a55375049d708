#![allow(dead_code)]

use chrono::NaiveDate;
use kabusim::domain::condition::{
    Comparison, Condition, ConditionGroup, LogicalOperator, PriceRef,
};
use kabusim::domain::engine::EngineParams;
use kabusim::domain::quote::{DailyQuote, PriceType};
use kabusim::domain::timeref::TimeReference;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily quotes from 2024-01-01 with the given closes.
pub fn make_quotes(closes: &[f64]) -> Vec<DailyQuote> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| DailyQuote {
            date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10_000.0,
            ..DailyQuote::default()
        })
        .collect()
}

pub fn close_group(op: Comparison, value: f64) -> ConditionGroup {
    ConditionGroup::new(
        LogicalOperator::And,
        vec![Condition::Price {
            price: PriceRef {
                price_type: PriceType::Close,
                reference: TimeReference::Current,
            },
            op,
            value,
        }],
    )
}

pub fn profit_loss_group(op: Option<Comparison>, value: f64) -> ConditionGroup {
    ConditionGroup::new(
        LogicalOperator::And,
        vec![Condition::ProfitLossPercent { op, value }],
    )
}

pub fn disabled_group() -> ConditionGroup {
    profit_loss_group(None, 0.0)
}

/// Buy above / sell below the given levels, exits disabled.
pub fn threshold_params(buy_above: f64, sell_below: f64) -> EngineParams {
    EngineParams {
        initial_cash: 1_000_000.0,
        max_position_pct: 100.0,
        buy: close_group(Comparison::Gt, buy_above),
        sell: close_group(Comparison::Lt, sell_below),
        take_profit: disabled_group(),
        stop_loss: disabled_group(),
    }
}
