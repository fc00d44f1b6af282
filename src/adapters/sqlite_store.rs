//! SQLite snapshot adapter.

use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::domain::config::DataField;
use crate::domain::error::BitacoreError;
use crate::domain::snapshot::{Observation, Snapshot};
use crate::ports::config_port::ConfigPort;
use crate::ports::snapshot_port::SnapshotPort;

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BitacoreError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| BitacoreError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, BitacoreError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), BitacoreError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS observations (
                field TEXT NOT NULL,
                instrument TEXT NOT NULL,
                date TEXT NOT NULL,
                value REAL NOT NULL,
                PRIMARY KEY (field, instrument, date)
            );
            CREATE INDEX IF NOT EXISTS idx_observations_field_date
                ON observations(field, date);",
        )
        .map_err(|e: rusqlite::Error| BitacoreError::Storage {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    pub fn insert_observations(
        &self,
        field: DataField,
        observations: &[Observation],
    ) -> Result<usize, BitacoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        let mut inserted = 0;
        for obs in observations {
            if !obs.value.is_finite() {
                continue;
            }
            tx.execute(
                "INSERT OR REPLACE INTO observations (field, instrument, date, value)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    field.as_str(),
                    obs.instrument,
                    obs.date.format("%Y-%m-%d").to_string(),
                    obs.value
                ],
            )
            .map_err(|e: rusqlite::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;
            inserted += 1;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        Ok(inserted)
    }
}

impl SnapshotPort for SqliteStore {
    fn fetch(&self, field: DataField, date: NaiveDate) -> Result<Snapshot, BitacoreError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        // Latest observation at or before the cutoff, per instrument.
        let query = "SELECT o.instrument, o.value
                     FROM observations o
                     JOIN (SELECT instrument, MAX(date) AS latest
                           FROM observations
                           WHERE field = ?1 AND date <= ?2
                           GROUP BY instrument) m
                       ON o.instrument = m.instrument AND o.date = m.latest
                     WHERE o.field = ?1
                     ORDER BY o.instrument";

        let date_str = date.format("%Y-%m-%d").to_string();
        let mut stmt = conn
            .prepare(query)
            .map_err(|e: rusqlite::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![field.as_str(), date_str], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })
            .map_err(|e: rusqlite::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        let mut snapshot = Snapshot::new(date);
        for row in rows {
            let (instrument, value) =
                row.map_err(|e: rusqlite::Error| BitacoreError::Storage {
                    reason: e.to_string(),
                })?;
            if value.is_finite() {
                snapshot.values.insert(instrument, value);
            }
        }

        if snapshot.is_empty() {
            return Err(BitacoreError::NoData {
                field: field.to_string(),
                date,
            });
        }

        Ok(snapshot)
    }

    fn data_range(&self, field: DataField) -> Result<(NaiveDate, NaiveDate), BitacoreError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        let query = "SELECT MIN(date), MAX(date), COUNT(*)
                     FROM observations WHERE field = ?1";

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(query, params![field.as_str()], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e: rusqlite::Error| BitacoreError::Storage {
                reason: e.to_string(),
            })?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let min = NaiveDate::parse_from_str(&min_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| BitacoreError::Storage {
                        reason: e.to_string(),
                    },
                )?;
                let max = NaiveDate::parse_from_str(&max_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| BitacoreError::Storage {
                        reason: e.to_string(),
                    },
                )?;
                Ok((min, max))
            }
            _ => Err(BitacoreError::Storage {
                reason: format!("no observations for field {}", field),
            }),
        }
    }
}
