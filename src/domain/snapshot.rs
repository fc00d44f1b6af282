//! Point-in-time snapshots of instrument values.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One raw observation: an instrument's value on a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub instrument: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// The latest-known value per instrument as of a single date.
///
/// Keys are unique and iterate in instrument order, so identical inputs
/// always produce identical downstream rankings.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub values: BTreeMap<String, f64>,
}

impl Snapshot {
    pub fn new(date: NaiveDate) -> Self {
        Snapshot {
            date,
            values: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build the snapshot for `date` from raw observations: for each instrument,
/// the most recent observation dated at or before `date`. Observations after
/// `date` are invisible; non-finite values are ignored. For equal dates the
/// last observation in input order wins.
pub fn as_of(date: NaiveDate, observations: &[Observation]) -> Snapshot {
    let mut latest: BTreeMap<&str, (NaiveDate, f64)> = BTreeMap::new();

    for obs in observations {
        if obs.date > date || !obs.value.is_finite() {
            continue;
        }
        match latest.get(obs.instrument.as_str()) {
            Some((seen, _)) if *seen > obs.date => {}
            _ => {
                latest.insert(obs.instrument.as_str(), (obs.date, obs.value));
            }
        }
    }

    let mut snapshot = Snapshot::new(date);
    for (instrument, (_, value)) in latest {
        snapshot.values.insert(instrument.to_string(), value);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obs(instrument: &str, d: NaiveDate, value: f64) -> Observation {
        Observation {
            instrument: instrument.to_string(),
            date: d,
            value,
        }
    }

    #[test]
    fn latest_value_at_or_before_date_wins() {
        let observations = vec![
            obs("AAPL", date(2024, 1, 2), 100.0),
            obs("AAPL", date(2024, 3, 1), 120.0),
            obs("AAPL", date(2024, 3, 31), 130.0),
        ];
        let snapshot = as_of(date(2024, 3, 31), &observations);
        assert_eq!(snapshot.values["AAPL"], 130.0);
    }

    #[test]
    fn future_observations_are_invisible() {
        let observations = vec![
            obs("AAPL", date(2024, 1, 2), 100.0),
            obs("AAPL", date(2024, 4, 2), 999.0),
            obs("MSFT", date(2024, 4, 2), 50.0),
        ];
        let snapshot = as_of(date(2024, 3, 31), &observations);
        assert_eq!(snapshot.values["AAPL"], 100.0);
        assert!(!snapshot.values.contains_key("MSFT"));
    }

    #[test]
    fn non_finite_values_are_dropped() {
        let observations = vec![
            obs("AAPL", date(2024, 1, 2), f64::NAN),
            obs("MSFT", date(2024, 1, 2), f64::INFINITY),
            obs("GOOG", date(2024, 1, 2), 42.0),
        ];
        let snapshot = as_of(date(2024, 3, 31), &observations);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.values["GOOG"], 42.0);
    }

    #[test]
    fn no_qualifying_observations_yield_empty_snapshot() {
        let observations = vec![obs("AAPL", date(2024, 6, 1), 100.0)];
        let snapshot = as_of(date(2024, 3, 31), &observations);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn stale_instruments_carry_forward() {
        let observations = vec![
            obs("AAPL", date(2024, 3, 28), 100.0),
            obs("MSFT", date(2024, 1, 15), 80.0),
        ];
        let snapshot = as_of(date(2024, 3, 31), &observations);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.values["MSFT"], 80.0);
    }
}
