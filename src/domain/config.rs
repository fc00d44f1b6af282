//! Validated backtest configuration.
//!
//! The raw tags on [`BacktestRequest`] are checked here, once, at
//! construction. Everything downstream dispatches over closed enums, so an
//! unsupported rule, filter, weighting or data field can never reach the
//! data provider.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::error::BitacoreError;
use crate::domain::schema::{BacktestRequest, StrategySummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarRule {
    Quarterly,
}

impl FromStr for CalendarRule {
    type Err = BitacoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Quarterly" => Ok(CalendarRule::Quarterly),
            other => Err(BitacoreError::UnknownCalendarRule {
                rule_type: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CalendarRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarRule::Quarterly => write!(f, "Quarterly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    TopN,
}

impl FromStr for FilterRule {
    type Err = BitacoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TopN" => Ok(FilterRule::TopN),
            other => Err(BitacoreError::UnknownFilterType {
                filter_type: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRule::TopN => write!(f, "TopN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightingRule {
    Equal,
}

impl FromStr for WeightingRule {
    type Err = BitacoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Equal" => Ok(WeightingRule::Equal),
            other => Err(BitacoreError::UnknownWeightingType {
                weighting_type: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for WeightingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightingRule::Equal => write!(f, "Equal"),
        }
    }
}

/// The closed set of rankable data fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataField {
    MarketCapitalization,
    Prices,
    Volume,
    Adtv3Month,
}

impl DataField {
    pub const ALL: [DataField; 4] = [
        DataField::MarketCapitalization,
        DataField::Prices,
        DataField::Volume,
        DataField::Adtv3Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataField::MarketCapitalization => "market_capitalization",
            DataField::Prices => "prices",
            DataField::Volume => "volume",
            DataField::Adtv3Month => "adtv_3_month",
        }
    }
}

impl FromStr for DataField {
    type Err = BitacoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market_capitalization" => Ok(DataField::MarketCapitalization),
            "prices" => Ok(DataField::Prices),
            "volume" => Ok(DataField::Volume),
            "adtv_3_month" => Ok(DataField::Adtv3Month),
            other => Err(BitacoreError::UnknownDataField {
                field: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fully validated configuration; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktestConfig {
    pub calendar_rule: CalendarRule,
    pub initial_date: NaiveDate,
    pub filter: FilterRule,
    pub n: usize,
    pub data_field: DataField,
    pub weighting: WeightingRule,
}

impl BacktestConfig {
    pub fn strategy_summary(&self) -> StrategySummary {
        StrategySummary {
            calendar: self.calendar_rule.to_string(),
            filter: self.filter.to_string(),
            weighting: self.weighting.to_string(),
        }
    }
}

impl TryFrom<&BacktestRequest> for BacktestConfig {
    type Error = BitacoreError;

    fn try_from(request: &BacktestRequest) -> Result<Self, Self::Error> {
        let calendar_rule = request.calendar_rule.rule_type.parse()?;
        let filter = request.portfolio_creation.filter_type.parse()?;
        let weighting = request.weighting_scheme.weighting_type.parse()?;
        let data_field = request.portfolio_creation.data_field.parse()?;

        let n = request.portfolio_creation.n;
        if n <= 0 {
            return Err(BitacoreError::InvalidPortfolioSize { n });
        }

        Ok(BacktestConfig {
            calendar_rule,
            initial_date: request.calendar_rule.initial_date,
            filter,
            n: n as usize,
            data_field,
            weighting,
        })
    }
}
