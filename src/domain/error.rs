//! Domain error types.

use chrono::NaiveDate;

/// Coarse error classification carried by every [`BitacoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any data access; zero side effects.
    Configuration,
    /// Raised while touching the data store; aborts the run.
    DataUnavailable,
    /// Free text could not be mapped to a supported configuration.
    PromptParse,
    /// Filesystem problem outside the data store itself.
    Io,
}

/// Top-level error type for bitacore.
#[derive(Debug, thiserror::Error)]
pub enum BitacoreError {
    #[error("unknown calendar rule: '{rule_type}'. Available options: ['Quarterly']")]
    UnknownCalendarRule { rule_type: String },

    #[error("unknown filter type: '{filter_type}'. Available options: ['TopN']")]
    UnknownFilterType { filter_type: String },

    #[error("unknown weighting type: '{weighting_type}'. Available options: ['Equal']")]
    UnknownWeightingType { weighting_type: String },

    #[error(
        "invalid data_field: '{field}'. Must be one of \
         ['market_capitalization', 'prices', 'volume', 'adtv_3_month']"
    )]
    UnknownDataField { field: String },

    #[error("portfolio size must be positive, got {n}")]
    InvalidPortfolioSize { n: i64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no {field} data at or before {date}")]
    NoData { field: String, date: NaiveDate },

    #[error("start date {start} outside available range {min} to {max}")]
    StartDateOutOfRange {
        start: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("data store error: {reason}")]
    Storage { reason: String },

    #[error("rebalance on {date} failed: {reason}")]
    RebalanceFailed { date: NaiveDate, reason: String },

    #[error("failed to parse prompt: {reason}")]
    PromptParse { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BitacoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BitacoreError::UnknownCalendarRule { .. }
            | BitacoreError::UnknownFilterType { .. }
            | BitacoreError::UnknownWeightingType { .. }
            | BitacoreError::UnknownDataField { .. }
            | BitacoreError::InvalidPortfolioSize { .. }
            | BitacoreError::ConfigParse { .. }
            | BitacoreError::ConfigMissing { .. }
            | BitacoreError::ConfigInvalid { .. } => ErrorKind::Configuration,
            BitacoreError::NoData { .. }
            | BitacoreError::StartDateOutOfRange { .. }
            | BitacoreError::Storage { .. }
            | BitacoreError::RebalanceFailed { .. } => ErrorKind::DataUnavailable,
            BitacoreError::PromptParse { .. } => ErrorKind::PromptParse,
            BitacoreError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<&BitacoreError> for std::process::ExitCode {
    fn from(err: &BitacoreError) -> Self {
        let code: u8 = match err.kind() {
            ErrorKind::Io => 1,
            ErrorKind::Configuration => 2,
            ErrorKind::PromptParse => 4,
            ErrorKind::DataUnavailable => 5,
        };
        std::process::ExitCode::from(code)
    }
}
