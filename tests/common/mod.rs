#![allow(dead_code)]

use bitacore::domain::config::{BacktestConfig, DataField};
use bitacore::domain::error::BitacoreError;
use bitacore::domain::schema::{
    BacktestRequest, CalendarRules, PortfolioCreation, WeightingScheme,
};
use bitacore::domain::snapshot::{self, Observation, Snapshot};
use bitacore::ports::snapshot_port::SnapshotPort;
use chrono::NaiveDate;
use std::cell::Cell;
use std::collections::HashMap;

pub struct MockSnapshotPort {
    pub observations: HashMap<DataField, Vec<Observation>>,
    pub fail_on: Option<NaiveDate>,
    fetch_calls: Cell<usize>,
    range_calls: Cell<usize>,
}

impl MockSnapshotPort {
    pub fn new() -> Self {
        Self {
            observations: HashMap::new(),
            fail_on: None,
            fetch_calls: Cell::new(0),
            range_calls: Cell::new(0),
        }
    }

    pub fn with_observation(
        mut self,
        field: DataField,
        instrument: &str,
        date_str: &str,
        value: f64,
    ) -> Self {
        self.observations.entry(field).or_default().push(Observation {
            instrument: instrument.to_string(),
            date: date(date_str),
            value,
        });
        self
    }

    pub fn with_failure_on(mut self, date_str: &str) -> Self {
        self.fail_on = Some(date(date_str));
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.get()
    }

    pub fn range_calls(&self) -> usize {
        self.range_calls.get()
    }

    pub fn total_calls(&self) -> usize {
        self.fetch_calls() + self.range_calls()
    }
}

impl SnapshotPort for MockSnapshotPort {
    fn fetch(&self, field: DataField, as_of: NaiveDate) -> Result<Snapshot, BitacoreError> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        if self.fail_on == Some(as_of) {
            return Err(BitacoreError::Storage {
                reason: "simulated storage outage".to_string(),
            });
        }
        let observations = self.observations.get(&field).cloned().unwrap_or_default();
        let snapshot = snapshot::as_of(as_of, &observations);
        if snapshot.is_empty() {
            return Err(BitacoreError::NoData {
                field: field.to_string(),
                date: as_of,
            });
        }
        Ok(snapshot)
    }

    fn data_range(&self, field: DataField) -> Result<(NaiveDate, NaiveDate), BitacoreError> {
        self.range_calls.set(self.range_calls.get() + 1);
        let observations = self.observations.get(&field);
        let min = observations.and_then(|o| o.iter().map(|x| x.date).min());
        let max = observations.and_then(|o| o.iter().map(|x| x.date).max());
        match (min, max) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(BitacoreError::Storage {
                reason: format!("no observations for field {field}"),
            }),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn sample_request(initial_date: &str) -> BacktestRequest {
    BacktestRequest {
        calendar_rule: CalendarRules {
            rule_type: "Quarterly".to_string(),
            initial_date: date(initial_date),
        },
        portfolio_creation: PortfolioCreation::default(),
        weighting_scheme: WeightingScheme::default(),
    }
}

pub fn sample_config(initial_date: &str) -> BacktestConfig {
    BacktestConfig::try_from(&sample_request(initial_date)).unwrap()
}

pub fn fixture_observations() -> Vec<(String, &'static str, f64)> {
    // 20 synthetic instruments observed just after New Year and just after
    // the first quarter boundary. SEC20 carries the largest value.
    let mut rows = Vec::new();
    for i in 1..=20u32 {
        let instrument = format!("SEC{i:02}");
        let value = (i as f64) * 100.0;
        rows.push((instrument.clone(), "2024-01-01", value));
        rows.push((instrument, "2024-04-01", value + 5.0));
    }
    rows
}

/// 20 instruments spanning exactly one quarter boundary (data ends 2024-04-01).
pub fn one_quarter_universe() -> MockSnapshotPort {
    let mut port = MockSnapshotPort::new();
    for (instrument, date_str, value) in fixture_observations() {
        port = port.with_observation(
            DataField::MarketCapitalization,
            &instrument,
            date_str,
            value,
        );
    }
    port
}

/// Same 20 instruments observed quarterly through 2024 (data ends 2025-01-02).
pub fn full_year_universe() -> MockSnapshotPort {
    let mut port = MockSnapshotPort::new();
    for i in 1..=20u32 {
        let instrument = format!("SEC{i:02}");
        for (q, date_str) in [
            "2024-01-01",
            "2024-04-01",
            "2024-07-01",
            "2024-10-01",
            "2025-01-02",
        ]
        .into_iter()
        .enumerate()
        {
            let value = (i as f64) * 100.0 + q as f64;
            port = port.with_observation(
                DataField::MarketCapitalization,
                &instrument,
                date_str,
                value,
            );
        }
    }
    port
}
