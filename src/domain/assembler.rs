//! Per-date portfolio assembly: selection composed with weighting.

use std::collections::BTreeMap;

use crate::domain::config::{BacktestConfig, FilterRule};
use crate::domain::error::BitacoreError;
use crate::domain::snapshot::Snapshot;
use crate::domain::{selection, weighting};

/// One date's portfolio plus at most one warning about how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub weights: BTreeMap<String, f64>,
    pub warning: Option<String>,
}

/// Assemble the portfolio for a single date from its snapshot.
///
/// Warns when the snapshot could not fill all requested slots, or when the
/// resulting portfolio is empty; neither is an error.
pub fn assemble(config: &BacktestConfig, snapshot: &Snapshot) -> Result<Assembly, BitacoreError> {
    let selected = match config.filter {
        FilterRule::TopN => selection::top_n(snapshot, config.n)?,
    };
    let weights = weighting::allocate(config.weighting, &selected.instruments);

    let warning = if weights.is_empty() {
        Some(format!("No weights calculated for {}", snapshot.date))
    } else if selected.is_under_capacity() {
        Some(format!(
            "On {}, only {} securities selected, requested {}",
            snapshot.date,
            selected.instruments.len(),
            config.n
        ))
    } else {
        None
    };

    Ok(Assembly { weights, warning })
}
