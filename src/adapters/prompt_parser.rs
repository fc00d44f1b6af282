//! Keyword prompt parsing adapter.
//!
//! Deterministic stand-in for an external natural-language service: maps
//! free text to a [`BacktestRequest`] by keyword and token scanning, and
//! rejects prompts that name unsupported rules, weightings or no usable
//! start date. Its output is consumed by the engine exactly like a
//! structured request.

use chrono::NaiveDate;

use crate::domain::error::BitacoreError;
use crate::domain::schema::{BacktestRequest, CalendarRules, PortfolioCreation, WeightingScheme};
use crate::ports::prompt_port::PromptPort;

pub struct KeywordPromptParser;

impl KeywordPromptParser {
    pub fn new() -> Self {
        KeywordPromptParser
    }
}

impl Default for KeywordPromptParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error(reason: impl Into<String>) -> BitacoreError {
    BitacoreError::PromptParse {
        reason: reason.into(),
    }
}

/// Split on anything that cannot be part of a word, a number or an ISO date.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn extract_initial_date(tokens: &[String]) -> Result<NaiveDate, BitacoreError> {
    for token in tokens {
        if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
            return Ok(date);
        }
    }
    Err(parse_error(
        "no start date found; expected an ISO date such as 2024-01-01",
    ))
}

fn extract_rule_type(tokens: &[String]) -> Result<String, BitacoreError> {
    for (i, token) in tokens.iter().enumerate() {
        let unsupported = match token.as_str() {
            "monthly" | "weekly" | "annual" | "annually" | "yearly" => true,
            // "average daily trading volume" names a data field, not a cadence
            "daily" => i == 0 || tokens[i - 1] != "average",
            _ => false,
        };
        if unsupported {
            return Err(parse_error(format!(
                "unsupported rebalance frequency '{token}'; only quarterly rebalancing is available"
            )));
        }
    }
    // Absent any frequency wording, quarterly is the default cadence.
    Ok("Quarterly".to_string())
}

fn extract_n(tokens: &[String]) -> Option<i64> {
    for pair in tokens.windows(2) {
        if pair[0] == "top" || pair[0] == "largest" || pair[0] == "biggest" {
            if let Ok(n) = pair[1].parse::<i64>() {
                return Some(n);
            }
        }
    }
    None
}

fn extract_data_field(text: &str) -> String {
    // Order matters: "average daily trading volume" also contains "volume".
    if text.contains("adtv") || text.contains("average daily") {
        "adtv_3_month".to_string()
    } else if text.contains("market cap") || text.contains("market_cap") || text.contains("capitalization") {
        "market_capitalization".to_string()
    } else if text.contains("volume") {
        "volume".to_string()
    } else if text.contains("price") {
        "prices".to_string()
    } else {
        "market_capitalization".to_string()
    }
}

fn extract_weighting(text: &str) -> Result<String, BitacoreError> {
    for unsupported in ["value weight", "cap weight", "market weight", "inverse vol"] {
        if text.contains(unsupported) {
            return Err(parse_error(format!(
                "unsupported weighting '{unsupported}'; only equal weighting is available"
            )));
        }
    }
    Ok("Equal".to_string())
}

impl PromptPort for KeywordPromptParser {
    fn parse(&self, prompt: &str) -> Result<BacktestRequest, BitacoreError> {
        if prompt.trim().is_empty() {
            return Err(parse_error("prompt must not be empty"));
        }

        let text = prompt.to_lowercase();
        let tokens = tokenize(prompt);

        let rule_type = extract_rule_type(&tokens)?;
        let initial_date = extract_initial_date(&tokens)?;
        let weighting_type = extract_weighting(&text)?;
        let data_field = extract_data_field(&text);

        let defaults = PortfolioCreation::default();
        let n = extract_n(&tokens).unwrap_or(defaults.n);

        Ok(BacktestRequest {
            calendar_rule: CalendarRules {
                rule_type,
                initial_date,
            },
            portfolio_creation: PortfolioCreation {
                filter_type: defaults.filter_type,
                n,
                data_field,
            },
            weighting_scheme: WeightingScheme {
                weighting_type,
            },
        })
    }
}
