//! Pre-run parameter checks. Everything here fails before the simulation
//! loop starts; nothing fails inside it.

use crate::domain::engine::EngineParams;
use crate::domain::error::KabusimError;
use crate::domain::quote::DailyQuote;

pub fn validate_params(quotes: &[DailyQuote], params: &EngineParams) -> Result<(), KabusimError> {
    if quotes.is_empty() {
        return Err(KabusimError::Data {
            reason: "quote series is empty".to_string(),
        });
    }

    if params.initial_cash <= 0.0 {
        return Err(KabusimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }

    if params.max_position_pct <= 0.0 || params.max_position_pct > 100.0 {
        return Err(KabusimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "max_position".to_string(),
            reason: "max_position must be in (0, 100]".to_string(),
        });
    }

    for (name, group) in [
        ("buy", &params.buy),
        ("sell", &params.sell),
        ("tp", &params.take_profit),
        ("sl", &params.stop_loss),
    ] {
        if group.conditions.is_empty() {
            return Err(KabusimError::EmptyConditionGroup {
                group: name.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition::{
        Comparison, Condition, ConditionGroup, LogicalOperator, PriceRef,
    };
    use crate::domain::quote::PriceType;
    use crate::domain::timeref::TimeReference;
    use chrono::NaiveDate;

    fn one_quote() -> Vec<DailyQuote> {
        vec![DailyQuote {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
            volume: 1000.0,
            ..DailyQuote::default()
        }]
    }

    fn simple_group() -> ConditionGroup {
        ConditionGroup::new(
            LogicalOperator::And,
            vec![Condition::Price {
                price: PriceRef {
                    price_type: PriceType::Close,
                    reference: TimeReference::Current,
                },
                op: Comparison::Gt,
                value: 100.0,
            }],
        )
    }

    fn valid_params() -> EngineParams {
        EngineParams {
            initial_cash: 1_000_000.0,
            max_position_pct: 100.0,
            buy: simple_group(),
            sell: simple_group(),
            take_profit: simple_group(),
            stop_loss: simple_group(),
        }
    }

    #[test]
    fn valid_params_pass() {
        assert!(validate_params(&one_quote(), &valid_params()).is_ok());
    }

    #[test]
    fn empty_series_rejected() {
        let err = validate_params(&[], &valid_params()).unwrap_err();
        assert!(matches!(err, KabusimError::Data { .. }));
    }

    #[test]
    fn non_positive_cash_rejected() {
        let mut p = valid_params();
        p.initial_cash = 0.0;
        let err = validate_params(&one_quote(), &p).unwrap_err();
        assert!(matches!(err, KabusimError::ConfigInvalid { key, .. } if key == "initial_cash"));
    }

    #[test]
    fn max_position_bounds() {
        let mut p = valid_params();
        p.max_position_pct = 0.0;
        assert!(validate_params(&one_quote(), &p).is_err());
        p.max_position_pct = 150.0;
        assert!(validate_params(&one_quote(), &p).is_err());
        p.max_position_pct = 100.0;
        assert!(validate_params(&one_quote(), &p).is_ok());
    }

    #[test]
    fn empty_group_rejected() {
        let mut p = valid_params();
        p.stop_loss.conditions.clear();
        let err = validate_params(&one_quote(), &p).unwrap_err();
        assert!(matches!(err, KabusimError::EmptyConditionGroup { group } if group == "sl"));
    }
}
