//! CSV file snapshot adapter.
//!
//! One `{field}.csv` per data field under a data directory, long format:
//! `instrument,date,value` with a header row.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::config::DataField;
use crate::domain::error::BitacoreError;
use crate::domain::snapshot::{self, Observation, Snapshot};
use crate::ports::config_port::ConfigPort;
use crate::ports::snapshot_port::SnapshotPort;

pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BitacoreError> {
        let dir = config
            .get_string("data", "dir")
            .ok_or_else(|| BitacoreError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            })?;
        Ok(Self::new(PathBuf::from(dir)))
    }

    fn field_path(&self, field: DataField) -> PathBuf {
        self.data_dir.join(format!("{}.csv", field.as_str()))
    }

    fn load_field(&self, field: DataField) -> Result<Vec<Observation>, BitacoreError> {
        let path = self.field_path(field);
        if !path.exists() {
            return Err(BitacoreError::Storage {
                reason: format!("data file not found: {}", path.display()),
            });
        }
        read_observations(&path)
    }
}

/// Parse a long-format observation CSV. Rows with non-finite values are
/// dropped; malformed rows are an error.
pub fn read_observations(path: &Path) -> Result<Vec<Observation>, BitacoreError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| BitacoreError::Storage {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut observations = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| BitacoreError::Storage {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })?;

        let instrument = record.get(0).ok_or_else(|| BitacoreError::Storage {
            reason: format!("missing instrument column in {}", path.display()),
        })?;

        let date_str = record.get(1).ok_or_else(|| BitacoreError::Storage {
            reason: format!("missing date column in {}", path.display()),
        })?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            BitacoreError::Storage {
                reason: format!("invalid date '{}' in {}: {}", date_str, path.display(), e),
            }
        })?;

        let value: f64 = record
            .get(2)
            .ok_or_else(|| BitacoreError::Storage {
                reason: format!("missing value column in {}", path.display()),
            })?
            .parse()
            .map_err(|e| BitacoreError::Storage {
                reason: format!("invalid value in {}: {}", path.display(), e),
            })?;

        if !value.is_finite() {
            continue;
        }

        observations.push(Observation {
            instrument: instrument.to_string(),
            date,
            value,
        });
    }

    Ok(observations)
}

impl SnapshotPort for CsvStore {
    fn fetch(&self, field: DataField, date: NaiveDate) -> Result<Snapshot, BitacoreError> {
        let observations = self.load_field(field)?;
        let snapshot = snapshot::as_of(date, &observations);
        if snapshot.is_empty() {
            return Err(BitacoreError::NoData {
                field: field.to_string(),
                date,
            });
        }
        Ok(snapshot)
    }

    fn data_range(&self, field: DataField) -> Result<(NaiveDate, NaiveDate), BitacoreError> {
        let observations = self.load_field(field)?;
        let min = observations.iter().map(|o| o.date).min();
        let max = observations.iter().map(|o| o.date).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(BitacoreError::Storage {
                reason: format!("no observations for field {}", field),
            }),
        }
    }
}
