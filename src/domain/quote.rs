//! Daily observation for one security: OHLCV plus the optional
//! fundamental/financial/company bundle delivered by the data provider.
//!
//! Everything beyond OHLCV is optional. Missing numeric fields compare as 0,
//! the adjusted close falls back to the raw close, and vwap falls back to the
//! close when used as a price.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,

    #[serde(default)]
    pub adjustment_close: Option<f64>,
    #[serde(default)]
    pub vwap: Option<f64>,
    #[serde(default)]
    pub turnover_value: Option<f64>,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,

    #[serde(default)]
    pub per: Option<f64>,
    #[serde(default)]
    pub pbr: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub bps: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub roa: Option<f64>,
    #[serde(default)]
    pub equity_ratio: Option<f64>,

    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub operating_income: Option<f64>,
    #[serde(default)]
    pub ordinary_income: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub total_assets: Option<f64>,
    #[serde(default)]
    pub net_assets: Option<f64>,
    #[serde(default)]
    pub cash_flow: Option<f64>,

    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

/// Which price of a quote a condition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceType {
    Open,
    Close,
    High,
    Low,
    AdjustmentClose,
    Vwap,
}

/// Optional numeric fields usable in field conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteField {
    Volume,
    TurnoverValue,
    SharesOutstanding,
    MarketCap,
    Per,
    Pbr,
    DividendYield,
    Eps,
    Bps,
    Roe,
    Roa,
    EquityRatio,
    Revenue,
    OperatingIncome,
    OrdinaryIncome,
    NetIncome,
    TotalAssets,
    NetAssets,
    CashFlow,
}

/// Categorical company attributes usable in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyAttribute {
    Market,
    Industry,
    Sector,
}

impl DailyQuote {
    pub fn price(&self, price_type: PriceType) -> f64 {
        match price_type {
            PriceType::Open => self.open,
            PriceType::Close => self.close,
            PriceType::High => self.high,
            PriceType::Low => self.low,
            PriceType::AdjustmentClose => self.adjustment_close.unwrap_or(self.close),
            PriceType::Vwap => self.vwap.unwrap_or(self.close),
        }
    }

    /// Missing optional fields read as 0.
    pub fn field(&self, field: QuoteField) -> f64 {
        match field {
            QuoteField::Volume => self.volume,
            QuoteField::TurnoverValue => self.turnover_value.unwrap_or(0.0),
            QuoteField::SharesOutstanding => self.shares_outstanding.unwrap_or(0.0),
            QuoteField::MarketCap => self.market_cap.unwrap_or(0.0),
            QuoteField::Per => self.per.unwrap_or(0.0),
            QuoteField::Pbr => self.pbr.unwrap_or(0.0),
            QuoteField::DividendYield => self.dividend_yield.unwrap_or(0.0),
            QuoteField::Eps => self.eps.unwrap_or(0.0),
            QuoteField::Bps => self.bps.unwrap_or(0.0),
            QuoteField::Roe => self.roe.unwrap_or(0.0),
            QuoteField::Roa => self.roa.unwrap_or(0.0),
            QuoteField::EquityRatio => self.equity_ratio.unwrap_or(0.0),
            QuoteField::Revenue => self.revenue.unwrap_or(0.0),
            QuoteField::OperatingIncome => self.operating_income.unwrap_or(0.0),
            QuoteField::OrdinaryIncome => self.ordinary_income.unwrap_or(0.0),
            QuoteField::NetIncome => self.net_income.unwrap_or(0.0),
            QuoteField::TotalAssets => self.total_assets.unwrap_or(0.0),
            QuoteField::NetAssets => self.net_assets.unwrap_or(0.0),
            QuoteField::CashFlow => self.cash_flow.unwrap_or(0.0),
        }
    }

    /// Missing categorical fields read as the empty string.
    pub fn attribute(&self, attribute: CompanyAttribute) -> &str {
        let value = match attribute {
            CompanyAttribute::Market => &self.market,
            CompanyAttribute::Industry => &self.industry,
            CompanyAttribute::Sector => &self.sector,
        };
        value.as_deref().unwrap_or("")
    }
}
