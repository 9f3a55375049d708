//! Parsing of the untyped condition representation used at the external
//! interface (strategy JSON files, request bodies): an indicator identifier,
//! an integer period, and an open parameter map per condition.
//!
//! Unknown identifiers and missing required parameters are rejected here,
//! before any simulation runs. Optional parameters take the documented
//! defaults.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::condition::{
    CategoricalOp, Comparison, Condition, ConditionGroup, LogicalOperator, MaCompare, MaKind,
    PriceRef,
};
use crate::domain::error::KabusimError;
use crate::domain::quote::{CompanyAttribute, PriceType, QuoteField};
use crate::domain::timeref::TimeReference;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    pub indicator: String,
    #[serde(default = "default_period")]
    pub period: usize,
    #[serde(default)]
    pub params: HashMap<String, ParamValue>,
}

fn default_period() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawConditionGroup {
    pub operator: String,
    pub conditions: Vec<RawCondition>,
}

/// The four groups as they appear in a strategy file or request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStrategy {
    pub buy: RawConditionGroup,
    pub sell: RawConditionGroup,
    pub tp: RawConditionGroup,
    pub sl: RawConditionGroup,
}

/// Compiled counterpart of [`RawStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSet {
    pub buy: ConditionGroup,
    pub sell: ConditionGroup,
    pub take_profit: ConditionGroup,
    pub stop_loss: ConditionGroup,
}

/// Parse a strategy JSON document into typed condition groups.
pub fn parse_strategy(json: &str) -> Result<ConditionSet, KabusimError> {
    let raw: RawStrategy = serde_json::from_str(json)?;
    compile_strategy(&raw)
}

pub fn compile_strategy(raw: &RawStrategy) -> Result<ConditionSet, KabusimError> {
    for (name, group) in [
        ("buy", &raw.buy),
        ("sell", &raw.sell),
        ("tp", &raw.tp),
        ("sl", &raw.sl),
    ] {
        if group.conditions.is_empty() {
            return Err(KabusimError::EmptyConditionGroup {
                group: name.to_string(),
            });
        }
    }
    Ok(ConditionSet {
        buy: compile_group(&raw.buy)?,
        sell: compile_group(&raw.sell)?,
        take_profit: compile_group(&raw.tp)?,
        stop_loss: compile_group(&raw.sl)?,
    })
}

pub fn compile_group(raw: &RawConditionGroup) -> Result<ConditionGroup, KabusimError> {
    let operator = match raw.operator.to_ascii_uppercase().as_str() {
        "AND" => LogicalOperator::And,
        "OR" => LogicalOperator::Or,
        other => {
            return Err(KabusimError::ConfigInvalid {
                section: "conditions".to_string(),
                key: "operator".to_string(),
                reason: format!("expected AND or OR, got {other}"),
            })
        }
    };
    let conditions = raw
        .conditions
        .iter()
        .map(compile_condition)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ConditionGroup::new(operator, conditions))
}

pub fn compile_condition(raw: &RawCondition) -> Result<Condition, KabusimError> {
    let p = Params {
        indicator: &raw.indicator,
        map: &raw.params,
    };

    match raw.indicator.as_str() {
        "price" => Ok(Condition::Price {
            price: PriceRef {
                price_type: p.price_type_or("price_type", PriceType::Close)?,
                reference: p.time_reference("time_reference", "reference_period")?,
            },
            op: p.comparison("operator")?,
            value: p.number("value")?,
        }),
        "price_comparison" => Ok(Condition::PriceComparison {
            left: PriceRef {
                price_type: p.price_type_or("price_type_1", PriceType::Close)?,
                reference: p.time_reference("time_reference_1", "reference_period_1")?,
            },
            op: p.comparison("operator")?,
            right: PriceRef {
                price_type: p.price_type_or("price_type_2", PriceType::Close)?,
                reference: p.time_reference("time_reference_2", "reference_period_2")?,
            },
        }),
        "market" | "industry" | "sector" => {
            let attribute = match raw.indicator.as_str() {
                "market" => CompanyAttribute::Market,
                "industry" => CompanyAttribute::Industry,
                _ => CompanyAttribute::Sector,
            };
            let op = match p.text("operator")? {
                "==" => CategoricalOp::Eq,
                "!=" => CategoricalOp::Ne,
                other => {
                    return Err(p.invalid("operator", format!("expected == or !=, got {other}")))
                }
            };
            Ok(Condition::Company {
                attribute,
                op,
                value: p.text("value")?.to_string(),
            })
        }
        "profit_loss_percent" => Ok(Condition::ProfitLossPercent {
            op: p.exit_comparison("operator")?,
            value: p.number_or("value", 0.0)?,
        }),
        "profit_loss_amount" => Ok(Condition::ProfitLossAmount {
            op: p.exit_comparison("operator")?,
            value: p.number_or("value", 0.0)?,
        }),
        "rsi" => Ok(Condition::Rsi {
            period: positive_period(&p, raw.period)?,
            overbought: p.number_or("overbought", 70.0)?,
            oversold: p.number_or("oversold", 30.0)?,
        }),
        "ma" => {
            let kind = match p.text_or("ma_type", "sma")?.to_ascii_lowercase().as_str() {
                "sma" => MaKind::Sma,
                "ema" => MaKind::Ema,
                other => {
                    return Err(p.invalid("ma_type", format!("expected sma or ema, got {other}")))
                }
            };
            let compare = match p.text_or("compare_target", "price")? {
                "price" => MaCompare::Price,
                "ma" => MaCompare::Ma {
                    period: p.number_or("compare_period", 5.0)? as usize,
                },
                other => {
                    return Err(
                        p.invalid("compare_target", format!("expected price or ma, got {other}"))
                    )
                }
            };
            Ok(Condition::Ma {
                kind,
                price_type: p.price_type_or("price_type", PriceType::Close)?,
                period: positive_period(&p, raw.period)?,
                op: p.comparison("operator")?,
                compare,
            })
        }
        "bollinger" => Ok(Condition::Bollinger {
            price_type: p.price_type_or("price_type", PriceType::Close)?,
            period: positive_period(&p, raw.period)?,
            std_dev_mult: p.number_or("std_dev", 2.0)?,
        }),
        other => {
            if let Some(field) = quote_field(other) {
                Ok(Condition::Field {
                    field,
                    reference: p.time_reference("time_reference", "reference_period")?,
                    op: p.comparison("operator")?,
                    value: p.number("value")?,
                })
            } else {
                Err(KabusimError::UnknownIndicator {
                    id: other.to_string(),
                })
            }
        }
    }
}

fn quote_field(id: &str) -> Option<QuoteField> {
    let field = match id {
        "volume" => QuoteField::Volume,
        "turnover_value" => QuoteField::TurnoverValue,
        "shares_outstanding" => QuoteField::SharesOutstanding,
        "market_cap" => QuoteField::MarketCap,
        "per" => QuoteField::Per,
        "pbr" => QuoteField::Pbr,
        "dividend_yield" => QuoteField::DividendYield,
        "eps" => QuoteField::Eps,
        "bps" => QuoteField::Bps,
        "roe" => QuoteField::Roe,
        "roa" => QuoteField::Roa,
        "equity_ratio" => QuoteField::EquityRatio,
        "revenue" => QuoteField::Revenue,
        "operating_income" => QuoteField::OperatingIncome,
        "ordinary_income" => QuoteField::OrdinaryIncome,
        "net_income" => QuoteField::NetIncome,
        "total_assets" => QuoteField::TotalAssets,
        "net_assets" => QuoteField::NetAssets,
        "cash_flow" => QuoteField::CashFlow,
        _ => return None,
    };
    Some(field)
}

fn positive_period(p: &Params<'_>, period: usize) -> Result<usize, KabusimError> {
    if period == 0 {
        return Err(p.invalid("period", "period must be positive".to_string()));
    }
    Ok(period)
}

/// Typed access to a condition's parameter map.
struct Params<'a> {
    indicator: &'a str,
    map: &'a HashMap<String, ParamValue>,
}

impl Params<'_> {
    fn missing(&self, param: &str) -> KabusimError {
        KabusimError::MissingParam {
            indicator: self.indicator.to_string(),
            param: param.to_string(),
        }
    }

    fn invalid(&self, param: &str, reason: String) -> KabusimError {
        KabusimError::InvalidParam {
            indicator: self.indicator.to_string(),
            param: param.to_string(),
            reason,
        }
    }

    fn number(&self, key: &str) -> Result<f64, KabusimError> {
        match self.map.get(key) {
            Some(ParamValue::Number(n)) => Ok(*n),
            Some(ParamValue::Text(_)) => Err(self.invalid(key, "expected a number".to_string())),
            None => Err(self.missing(key)),
        }
    }

    fn number_or(&self, key: &str, default: f64) -> Result<f64, KabusimError> {
        match self.map.get(key) {
            Some(ParamValue::Number(n)) => Ok(*n),
            Some(ParamValue::Text(_)) => Err(self.invalid(key, "expected a number".to_string())),
            None => Ok(default),
        }
    }

    fn text(&self, key: &str) -> Result<&str, KabusimError> {
        match self.map.get(key) {
            Some(ParamValue::Text(s)) => Ok(s),
            Some(ParamValue::Number(_)) => Err(self.invalid(key, "expected a string".to_string())),
            None => Err(self.missing(key)),
        }
    }

    fn text_or<'k>(&'k self, key: &str, default: &'k str) -> Result<&'k str, KabusimError> {
        match self.map.get(key) {
            Some(ParamValue::Text(s)) => Ok(s),
            Some(ParamValue::Number(_)) => Err(self.invalid(key, "expected a string".to_string())),
            None => Ok(default),
        }
    }

    fn comparison(&self, key: &str) -> Result<Comparison, KabusimError> {
        let text = self.text(key)?;
        parse_comparison(text).ok_or_else(|| {
            self.invalid(key, format!("expected one of > < >= <= == !=, got {text}"))
        })
    }

    /// Comparison for exit conditions, where `disabled` switches the
    /// condition off entirely.
    fn exit_comparison(&self, key: &str) -> Result<Option<Comparison>, KabusimError> {
        let text = self.text(key)?;
        if text == "disabled" {
            return Ok(None);
        }
        parse_comparison(text).map(Some).ok_or_else(|| {
            self.invalid(
                key,
                format!("expected one of > < >= <= == != disabled, got {text}"),
            )
        })
    }

    fn price_type_or(&self, key: &str, default: PriceType) -> Result<PriceType, KabusimError> {
        let text = match self.map.get(key) {
            Some(ParamValue::Text(s)) => s.as_str(),
            Some(ParamValue::Number(_)) => {
                return Err(self.invalid(key, "expected a string".to_string()))
            }
            None => return Ok(default),
        };
        match text {
            "open" => Ok(PriceType::Open),
            "close" => Ok(PriceType::Close),
            "high" => Ok(PriceType::High),
            "low" => Ok(PriceType::Low),
            "adjustment_close" | "adjustmentClose" => Ok(PriceType::AdjustmentClose),
            "vwap" => Ok(PriceType::Vwap),
            other => Err(self.invalid(key, format!("unknown price type {other}"))),
        }
    }

    fn time_reference(
        &self,
        kind_key: &str,
        period_key: &str,
    ) -> Result<TimeReference, KabusimError> {
        let kind = self.text_or(kind_key, "current")?;
        let period = self.number_or(period_key, 0.0)? as usize;
        match kind {
            "current" => Ok(TimeReference::Current),
            "days" => Ok(TimeReference::Days(period)),
            "weeks" => Ok(TimeReference::Weeks(period)),
            "months" => Ok(TimeReference::Months(period)),
            "quarters" => Ok(TimeReference::Quarters(period)),
            "years" => Ok(TimeReference::Years(period)),
            other => Err(self.invalid(kind_key, format!("unknown time reference {other}"))),
        }
    }
}

fn parse_comparison(text: &str) -> Option<Comparison> {
    match text {
        ">" => Some(Comparison::Gt),
        "<" => Some(Comparison::Lt),
        ">=" => Some(Comparison::Ge),
        "<=" => Some(Comparison::Le),
        "==" => Some(Comparison::Eq),
        "!=" => Some(Comparison::Ne),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(indicator: &str, period: usize, params: &[(&str, ParamValue)]) -> RawCondition {
        RawCondition {
            indicator: indicator.to_string(),
            period,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    fn num(v: f64) -> ParamValue {
        ParamValue::Number(v)
    }

    fn text(v: &str) -> ParamValue {
        ParamValue::Text(v.to_string())
    }

    #[test]
    fn price_condition_with_defaults() {
        let c = compile_condition(&raw(
            "price",
            1,
            &[("operator", text(">")), ("value", num(100.0))],
        ))
        .unwrap();
        assert_eq!(
            c,
            Condition::Price {
                price: PriceRef {
                    price_type: PriceType::Close,
                    reference: TimeReference::Current,
                },
                op: Comparison::Gt,
                value: 100.0,
            }
        );
    }

    #[test]
    fn price_condition_with_time_reference() {
        let c = compile_condition(&raw(
            "price",
            1,
            &[
                ("price_type", text("vwap")),
                ("time_reference", text("weeks")),
                ("reference_period", num(2.0)),
                ("operator", text("<=")),
                ("value", num(500.0)),
            ],
        ))
        .unwrap();
        assert_eq!(
            c,
            Condition::Price {
                price: PriceRef {
                    price_type: PriceType::Vwap,
                    reference: TimeReference::Weeks(2),
                },
                op: Comparison::Le,
                value: 500.0,
            }
        );
    }

    #[test]
    fn price_comparison_condition() {
        let c = compile_condition(&raw(
            "price_comparison",
            1,
            &[
                ("price_type_1", text("close")),
                ("operator", text(">")),
                ("price_type_2", text("open")),
                ("time_reference_2", text("days")),
                ("reference_period_2", num(1.0)),
            ],
        ))
        .unwrap();
        assert_eq!(
            c,
            Condition::PriceComparison {
                left: PriceRef {
                    price_type: PriceType::Close,
                    reference: TimeReference::Current,
                },
                op: Comparison::Gt,
                right: PriceRef {
                    price_type: PriceType::Open,
                    reference: TimeReference::Days(1),
                },
            }
        );
    }

    #[test]
    fn field_condition_identifiers() {
        for (id, field) in [
            ("volume", QuoteField::Volume),
            ("per", QuoteField::Per),
            ("market_cap", QuoteField::MarketCap),
            ("cash_flow", QuoteField::CashFlow),
        ] {
            let c = compile_condition(&raw(
                id,
                1,
                &[("operator", text("<")), ("value", num(20.0))],
            ))
            .unwrap();
            assert_eq!(
                c,
                Condition::Field {
                    field,
                    reference: TimeReference::Current,
                    op: Comparison::Lt,
                    value: 20.0,
                }
            );
        }
    }

    #[test]
    fn company_condition() {
        let c = compile_condition(&raw(
            "market",
            1,
            &[("operator", text("==")), ("value", text("プライム"))],
        ))
        .unwrap();
        assert_eq!(
            c,
            Condition::Company {
                attribute: CompanyAttribute::Market,
                op: CategoricalOp::Eq,
                value: "プライム".to_string(),
            }
        );
    }

    #[test]
    fn profit_loss_disabled_sentinel() {
        let c = compile_condition(&raw(
            "profit_loss_percent",
            1,
            &[("operator", text("disabled"))],
        ))
        .unwrap();
        assert_eq!(c, Condition::ProfitLossPercent { op: None, value: 0.0 });
    }

    #[test]
    fn profit_loss_enabled() {
        let c = compile_condition(&raw(
            "profit_loss_amount",
            1,
            &[("operator", text(">=")), ("value", num(50_000.0))],
        ))
        .unwrap();
        assert_eq!(
            c,
            Condition::ProfitLossAmount {
                op: Some(Comparison::Ge),
                value: 50_000.0,
            }
        );
    }

    #[test]
    fn rsi_defaults() {
        let c = compile_condition(&raw("rsi", 14, &[])).unwrap();
        assert_eq!(
            c,
            Condition::Rsi {
                period: 14,
                overbought: 70.0,
                oversold: 30.0,
            }
        );
    }

    #[test]
    fn rsi_custom_thresholds() {
        let c = compile_condition(&raw(
            "rsi",
            7,
            &[("overbought", num(80.0)), ("oversold", num(20.0))],
        ))
        .unwrap();
        assert_eq!(
            c,
            Condition::Rsi {
                period: 7,
                overbought: 80.0,
                oversold: 20.0,
            }
        );
    }

    #[test]
    fn ma_against_second_average() {
        let c = compile_condition(&raw(
            "ma",
            20,
            &[
                ("ma_type", text("ema")),
                ("operator", text(">")),
                ("compare_target", text("ma")),
                ("compare_period", num(5.0)),
            ],
        ))
        .unwrap();
        assert_eq!(
            c,
            Condition::Ma {
                kind: MaKind::Ema,
                price_type: PriceType::Close,
                period: 20,
                op: Comparison::Gt,
                compare: MaCompare::Ma { period: 5 },
            }
        );
    }

    #[test]
    fn bollinger_defaults() {
        let c = compile_condition(&raw("bollinger", 20, &[])).unwrap();
        assert_eq!(
            c,
            Condition::Bollinger {
                price_type: PriceType::Close,
                period: 20,
                std_dev_mult: 2.0,
            }
        );
    }

    #[test]
    fn unknown_indicator_rejected() {
        let err = compile_condition(&raw("macd_divergence", 1, &[])).unwrap_err();
        assert!(matches!(err, KabusimError::UnknownIndicator { id } if id == "macd_divergence"));
    }

    #[test]
    fn missing_operator_rejected() {
        let err =
            compile_condition(&raw("price", 1, &[("value", num(100.0))])).unwrap_err();
        assert!(
            matches!(err, KabusimError::MissingParam { indicator, param }
                if indicator == "price" && param == "operator")
        );
    }

    #[test]
    fn invalid_operator_rejected() {
        let err = compile_condition(&raw(
            "price",
            1,
            &[("operator", text("~")), ("value", num(100.0))],
        ))
        .unwrap_err();
        assert!(matches!(err, KabusimError::InvalidParam { param, .. } if param == "operator"));
    }

    #[test]
    fn disabled_rejected_outside_exit_conditions() {
        let err = compile_condition(&raw(
            "price",
            1,
            &[("operator", text("disabled")), ("value", num(100.0))],
        ))
        .unwrap_err();
        assert!(matches!(err, KabusimError::InvalidParam { .. }));
    }

    #[test]
    fn zero_period_rejected_for_windowed_indicators() {
        let err = compile_condition(&raw("rsi", 0, &[])).unwrap_err();
        assert!(matches!(err, KabusimError::InvalidParam { param, .. } if param == "period"));
    }

    #[test]
    fn group_operator_parsing() {
        let group = RawConditionGroup {
            operator: "or".to_string(),
            conditions: vec![raw(
                "price",
                1,
                &[("operator", text(">")), ("value", num(0.0))],
            )],
        };
        let compiled = compile_group(&group).unwrap();
        assert_eq!(compiled.operator, LogicalOperator::Or);

        let bad = RawConditionGroup {
            operator: "XOR".to_string(),
            conditions: vec![],
        };
        assert!(compile_group(&bad).is_err());
    }

    #[test]
    fn empty_group_rejected_at_parse_time() {
        let json = r#"{
            "buy": {"operator": "AND", "conditions": []},
            "sell": {"operator": "AND", "conditions": [
                {"indicator": "price", "period": 1,
                 "params": {"operator": "<", "value": 100}}]},
            "tp": {"operator": "AND", "conditions": [
                {"indicator": "profit_loss_percent", "period": 1,
                 "params": {"operator": "disabled"}}]},
            "sl": {"operator": "AND", "conditions": [
                {"indicator": "profit_loss_percent", "period": 1,
                 "params": {"operator": "disabled"}}]}
        }"#;
        let err = parse_strategy(json).unwrap_err();
        assert!(matches!(err, KabusimError::EmptyConditionGroup { group } if group == "buy"));
    }

    #[test]
    fn parse_full_strategy_json() {
        let json = r#"{
            "buy": {
                "operator": "AND",
                "conditions": [
                    {"indicator": "rsi", "period": 14, "params": {"oversold": 30}},
                    {"indicator": "per", "period": 1,
                     "params": {"operator": "<", "value": 20}}
                ]
            },
            "sell": {
                "operator": "OR",
                "conditions": [
                    {"indicator": "rsi", "period": 14, "params": {"overbought": 70}}
                ]
            },
            "tp": {
                "operator": "AND",
                "conditions": [
                    {"indicator": "profit_loss_percent", "period": 1,
                     "params": {"operator": ">", "value": 10}}
                ]
            },
            "sl": {
                "operator": "AND",
                "conditions": [
                    {"indicator": "profit_loss_percent", "period": 1,
                     "params": {"operator": "disabled"}}
                ]
            }
        }"#;
        let set = parse_strategy(json).unwrap();
        assert_eq!(set.buy.conditions.len(), 2);
        assert_eq!(set.sell.operator, LogicalOperator::Or);
        assert!(matches!(
            set.stop_loss.conditions[0],
            Condition::ProfitLossPercent { op: None, .. }
        ));
        assert!(matches!(
            set.take_profit.conditions[0],
            Condition::ProfitLossPercent {
                op: Some(Comparison::Gt),
                ..
            }
        ));
    }
}
