//! Wire-format request and response types.
//!
//! [`BacktestRequest`] carries raw string tags exactly as received (from a
//! JSON body or the prompt parser); validation into typed form happens in
//! [`crate::domain::config`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Portfolio weights keyed by rebalance date, dates and instruments ordered.
pub type WeightSchedule = BTreeMap<NaiveDate, BTreeMap<String, f64>>;

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarRules {
    #[serde(default = "default_rule_type")]
    pub rule_type: String,
    pub initial_date: NaiveDate,
}

fn default_rule_type() -> String {
    "Quarterly".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortfolioCreation {
    pub filter_type: String,
    pub n: i64,
    pub data_field: String,
}

impl Default for PortfolioCreation {
    fn default() -> Self {
        PortfolioCreation {
            filter_type: "TopN".to_string(),
            n: 10,
            data_field: "market_capitalization".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeightingScheme {
    pub weighting_type: String,
}

impl Default for WeightingScheme {
    fn default() -> Self {
        WeightingScheme {
            weighting_type: "Equal".to_string(),
        }
    }
}

/// A complete backtest request as supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct BacktestRequest {
    pub calendar_rule: CalendarRules,
    #[serde(default)]
    pub portfolio_creation: PortfolioCreation,
    #[serde(default)]
    pub weighting_scheme: WeightingScheme,
}

/// Echo of the strategy the run was configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategySummary {
    pub calendar: String,
    pub filter: String,
    pub weighting: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    /// Total execution time in seconds.
    pub execution_time: f64,
    /// Rebalance dates that produced a non-empty portfolio.
    pub rebalance_dates_processed: usize,
    /// Rebalance dates generated for the run.
    pub total_rebalance_dates: usize,
    pub average_assets_per_rebalance: f64,
    pub strategy: StrategySummary,
}

impl PerformanceMetrics {
    pub fn create(
        execution_time: f64,
        weights: &WeightSchedule,
        total_dates: usize,
        strategy: StrategySummary,
    ) -> Self {
        let average_assets_per_rebalance = if weights.is_empty() {
            0.0
        } else {
            weights.values().map(|w| w.len() as f64).sum::<f64>() / weights.len() as f64
        };
        PerformanceMetrics {
            execution_time,
            rebalance_dates_processed: weights.len(),
            total_rebalance_dates: total_dates,
            average_assets_per_rebalance,
            strategy,
        }
    }
}

/// Final result returned to the caller; owned exclusively by the run that
/// produced it.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResponse {
    pub execution_time: f64,
    pub weights: WeightSchedule,
    pub metadata: PerformanceMetrics,
    pub warnings: Vec<String>,
}
