//! Typed condition model: one enum variant per supported indicator.
//!
//! Conditions arrive over the external interface as an indicator identifier
//! plus an open parameter map (see [`crate::domain::condition_parser`]); the
//! closed set here is what the evaluator dispatches over.

use crate::domain::quote::{CompanyAttribute, PriceType, QuoteField};
use crate::domain::timeref::TimeReference;

const EPSILON: f64 = 1e-9;

/// Numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl Comparison {
    /// Equality comparisons are epsilon-tolerant.
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Gt => left > right,
            Comparison::Lt => left < right,
            Comparison::Ge => left >= right,
            Comparison::Le => left <= right,
            Comparison::Eq => (left - right).abs() < EPSILON,
            Comparison::Ne => (left - right).abs() >= EPSILON,
        }
    }
}

/// Equality-only operator for categorical attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalOp {
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaKind {
    Sma,
    Ema,
}

/// What the primary moving average is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaCompare {
    /// The current price of the condition's price type.
    Price,
    /// A second moving average of the same kind and price type.
    Ma { period: usize },
}

/// A (price type, time reference) pair, as used by price comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRef {
    pub price_type: PriceType,
    pub reference: TimeReference,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A price at a (possibly historical) index against a fixed level.
    Price {
        price: PriceRef,
        op: Comparison,
        value: f64,
    },
    /// Two independently resolved prices against each other.
    PriceComparison {
        left: PriceRef,
        op: Comparison,
        right: PriceRef,
    },
    /// An optional numeric quote field against a fixed level.
    Field {
        field: QuoteField,
        reference: TimeReference,
        op: Comparison,
        value: f64,
    },
    /// A categorical company attribute against a fixed string.
    Company {
        attribute: CompanyAttribute,
        op: CategoricalOp,
        value: String,
    },
    /// Percent return of the open position. `op` is None when disabled.
    ProfitLossPercent { op: Option<Comparison>, value: f64 },
    /// Absolute profit/loss of the open position. `op` is None when disabled.
    ProfitLossAmount { op: Option<Comparison>, value: f64 },
    Rsi {
        period: usize,
        overbought: f64,
        oversold: f64,
    },
    Ma {
        kind: MaKind,
        price_type: PriceType,
        period: usize,
        op: Comparison,
        compare: MaCompare,
    },
    Bollinger {
        price_type: PriceType,
        period: usize,
        std_dev_mult: f64,
    },
}

/// Ordered, non-empty list of conditions joined by AND/OR.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionGroup {
    pub operator: LogicalOperator,
    pub conditions: Vec<Condition>,
}

impl ConditionGroup {
    pub fn new(operator: LogicalOperator, conditions: Vec<Condition>) -> Self {
        Self {
            operator,
            conditions,
        }
    }
}
