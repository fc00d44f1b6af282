//! Data snapshot access port trait.

use chrono::NaiveDate;

use crate::domain::config::DataField;
use crate::domain::error::BitacoreError;
use crate::domain::snapshot::Snapshot;

/// Storage-agnostic access to historical instrument values.
pub trait SnapshotPort {
    /// The latest known value per instrument for `field` as of `date`.
    ///
    /// Implementations must never surface observations dated after `date`,
    /// and must fail with a data-unavailable error when no instrument has
    /// any observation at or before `date`.
    fn fetch(&self, field: DataField, date: NaiveDate) -> Result<Snapshot, BitacoreError>;

    /// Earliest and latest observation dates available for `field`.
    fn data_range(&self, field: DataField) -> Result<(NaiveDate, NaiveDate), BitacoreError>;
}
