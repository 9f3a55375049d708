//! Condition evaluation: one condition and one series index yield a ternary
//! signal; a condition group folds signals into a single boolean decision.
//!
//! # Semantics
//!
//! - Comparison-style conditions are strictly favorable or unfavorable.
//! - RSI/MA/Bollinger yield `Neutral` while their window is incomplete, and
//!   RSI/Bollinger also yield `Neutral` between their thresholds/bands.
//! - Position conditions are unfavorable without an open position and when
//!   disabled.
//! - Evaluation is pure and only reads indices `<= index`.

use crate::domain::condition::{
    CategoricalOp, Condition, ConditionGroup, LogicalOperator, MaCompare, MaKind,
};
use crate::domain::indicator::{bollinger, ma, rsi};
use crate::domain::position::Position;
use crate::domain::quote::DailyQuote;
use crate::domain::timeref::resolve_index;

/// Ternary outcome of evaluating one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Favorable,
    Unfavorable,
    Neutral,
}

impl Signal {
    fn from_bool(favorable: bool) -> Self {
        if favorable {
            Signal::Favorable
        } else {
            Signal::Unfavorable
        }
    }

    pub fn is_favorable(self) -> bool {
        self == Signal::Favorable
    }
}

pub fn evaluate_condition(
    condition: &Condition,
    quotes: &[DailyQuote],
    index: usize,
    position: Option<&Position>,
) -> Signal {
    match condition {
        Condition::Price { price, op, value } => {
            let i = resolve_index(quotes, index, price.reference);
            Signal::from_bool(op.apply(quotes[i].price(price.price_type), *value))
        }
        Condition::PriceComparison { left, op, right } => {
            let li = resolve_index(quotes, index, left.reference);
            let ri = resolve_index(quotes, index, right.reference);
            Signal::from_bool(op.apply(
                quotes[li].price(left.price_type),
                quotes[ri].price(right.price_type),
            ))
        }
        Condition::Field {
            field,
            reference,
            op,
            value,
        } => {
            let i = resolve_index(quotes, index, *reference);
            Signal::from_bool(op.apply(quotes[i].field(*field), *value))
        }
        Condition::Company {
            attribute,
            op,
            value,
        } => {
            let equal = quotes[index].attribute(*attribute) == value;
            Signal::from_bool(match op {
                CategoricalOp::Eq => equal,
                CategoricalOp::Ne => !equal,
            })
        }
        Condition::ProfitLossPercent { op, value } => match (op, position) {
            (Some(op), Some(pos)) => {
                Signal::from_bool(op.apply(pos.return_percent(quotes[index].close), *value))
            }
            _ => Signal::Unfavorable,
        },
        Condition::ProfitLossAmount { op, value } => match (op, position) {
            (Some(op), Some(pos)) => {
                Signal::from_bool(op.apply(pos.profit_loss(quotes[index].close), *value))
            }
            _ => Signal::Unfavorable,
        },
        Condition::Rsi {
            period,
            overbought,
            oversold,
        } => match rsi::rsi_at(quotes, index, *period) {
            Some(value) if value <= *oversold => Signal::Favorable,
            Some(value) if value >= *overbought => Signal::Unfavorable,
            _ => Signal::Neutral,
        },
        Condition::Ma {
            kind,
            price_type,
            period,
            op,
            compare,
        } => {
            let average = match kind {
                MaKind::Sma => ma::sma_at(quotes, index, *period, *price_type),
                MaKind::Ema => ma::ema_at(quotes, index, *period, *price_type),
            };
            let subject = match compare {
                MaCompare::Price => Some(quotes[index].price(*price_type)),
                MaCompare::Ma { period } => match kind {
                    MaKind::Sma => ma::sma_at(quotes, index, *period, *price_type),
                    MaKind::Ema => ma::ema_at(quotes, index, *period, *price_type),
                },
            };
            match (subject, average) {
                (Some(subject), Some(average)) => Signal::from_bool(op.apply(subject, average)),
                _ => Signal::Neutral,
            }
        }
        Condition::Bollinger {
            price_type,
            period,
            std_dev_mult,
        } => match bollinger::bands_at(quotes, index, *period, *std_dev_mult, *price_type) {
            Some(bands) => {
                let price = quotes[index].price(*price_type);
                if price > bands.upper {
                    Signal::Unfavorable
                } else if price < bands.lower {
                    Signal::Favorable
                } else {
                    Signal::Neutral
                }
            }
            None => Signal::Neutral,
        },
    }
}

/// True when the group's conditions, combined under its operator, all (AND)
/// or any (OR) evaluate favorable.
pub fn evaluate_group(
    group: &ConditionGroup,
    quotes: &[DailyQuote],
    index: usize,
    position: Option<&Position>,
) -> bool {
    match group.operator {
        LogicalOperator::And => group
            .conditions
            .iter()
            .all(|c| evaluate_condition(c, quotes, index, position).is_favorable()),
        LogicalOperator::Or => group
            .conditions
            .iter()
            .any(|c| evaluate_condition(c, quotes, index, position).is_favorable()),
    }
}
