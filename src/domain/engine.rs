//! Backtest orchestration.
//!
//! Drives the rebalance date sequence against an injected [`SnapshotPort`],
//! assembling one portfolio per date and aggregating weights, warnings and
//! run metadata. A run either completes fully or reports exactly one error;
//! the first chronological failure wins and no partial schedule escapes.

use std::time::Instant;

use chrono::{NaiveDate, Utc};

use crate::domain::assembler;
use crate::domain::calendar;
use crate::domain::config::BacktestConfig;
use crate::domain::error::BitacoreError;
use crate::domain::schema::{BacktestResponse, PerformanceMetrics, WeightSchedule};
use crate::ports::snapshot_port::SnapshotPort;

pub struct BacktestEngine<'a> {
    snapshots: &'a dyn SnapshotPort,
}

impl<'a> BacktestEngine<'a> {
    pub fn new(snapshots: &'a dyn SnapshotPort) -> Self {
        BacktestEngine { snapshots }
    }

    /// Run a backtest with the processing-time horizon set to today.
    pub fn run(&self, config: &BacktestConfig) -> Result<BacktestResponse, BitacoreError> {
        self.run_as_of(config, Utc::now().date_naive())
    }

    /// Run a backtest as if "now" were `as_of`.
    ///
    /// Rebalance dates never extend past `as_of` nor past the last
    /// available observation for the configured field, so the schedule is
    /// bounded by what was knowable at processing time.
    pub fn run_as_of(
        &self,
        config: &BacktestConfig,
        as_of: NaiveDate,
    ) -> Result<BacktestResponse, BitacoreError> {
        let started = Instant::now();

        let (min_available, max_available) = self.snapshots.data_range(config.data_field)?;
        if config.initial_date < min_available || config.initial_date > max_available {
            return Err(BitacoreError::StartDateOutOfRange {
                start: config.initial_date,
                min: min_available,
                max: max_available,
            });
        }

        let horizon = as_of.min(max_available);
        let dates = calendar::generate(config.calendar_rule, config.initial_date, horizon);
        tracing::debug!(
            field = %config.data_field,
            total = dates.len(),
            %horizon,
            "rebalance dates generated"
        );

        let mut weights = WeightSchedule::new();
        let mut warnings = Vec::new();

        for date in &dates {
            let snapshot = self
                .snapshots
                .fetch(config.data_field, *date)
                .map_err(|err| match err {
                    err @ BitacoreError::NoData { .. } => err,
                    other => BitacoreError::RebalanceFailed {
                        date: *date,
                        reason: other.to_string(),
                    },
                })?;

            let assembly = assembler::assemble(config, &snapshot)?;
            tracing::debug!(%date, assets = assembly.weights.len(), "rebalance complete");

            if let Some(warning) = assembly.warning {
                warnings.push(warning);
            }
            if !assembly.weights.is_empty() {
                weights.insert(*date, assembly.weights);
            }
        }

        let execution_time = started.elapsed().as_secs_f64();
        let metadata = PerformanceMetrics::create(
            execution_time,
            &weights,
            dates.len(),
            config.strategy_summary(),
        );
        tracing::info!(
            processed = metadata.rebalance_dates_processed,
            total = metadata.total_rebalance_dates,
            warnings = warnings.len(),
            "backtest complete"
        );

        Ok(BacktestResponse {
            execution_time,
            weights,
            metadata,
            warnings,
        })
    }
}
