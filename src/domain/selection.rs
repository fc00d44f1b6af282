//! Asset selection filters.

use crate::domain::error::BitacoreError;
use crate::domain::snapshot::Snapshot;

/// Outcome of a selection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Selected instrument ids, highest-ranked first.
    pub instruments: Vec<String>,
    /// How many requested slots went unfilled (under-capacity signal).
    pub shortfall: usize,
}

impl Selection {
    pub fn is_under_capacity(&self) -> bool {
        self.shortfall > 0
    }
}

/// Select the `n` instruments with the highest value in `snapshot`.
///
/// Ties break by ascending instrument id, so the result is reproducible and
/// independent of snapshot iteration order. A snapshot with fewer than `n`
/// instruments selects them all and reports the shortfall; `n == 0` is a
/// configuration error.
pub fn top_n(snapshot: &Snapshot, n: usize) -> Result<Selection, BitacoreError> {
    if n == 0 {
        return Err(BitacoreError::InvalidPortfolioSize { n: 0 });
    }

    let mut ranked: Vec<(&String, f64)> = snapshot.values.iter().map(|(id, v)| (id, *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let take = n.min(ranked.len());
    let instruments = ranked[..take].iter().map(|(id, _)| (*id).clone()).collect();

    Ok(Selection {
        instruments,
        shortfall: n - take,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn snapshot(values: &[(&str, f64)]) -> Snapshot {
        Snapshot {
            date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            values: values
                .iter()
                .map(|(id, v)| (id.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn highest_values_win() {
        let snap = snapshot(&[("A", 10.0), ("B", 20.0), ("C", 5.0)]);
        let selection = top_n(&snap, 2).unwrap();
        assert_eq!(selection.instruments, vec!["B", "A"]);
        assert_eq!(selection.shortfall, 0);
    }

    #[test]
    fn selection_is_independent_of_insertion_order() {
        let forward = snapshot(&[("A", 10.0), ("B", 20.0), ("C", 5.0)]);
        let reversed = snapshot(&[("C", 5.0), ("B", 20.0), ("A", 10.0)]);
        assert_eq!(
            top_n(&forward, 2).unwrap(),
            top_n(&reversed, 2).unwrap()
        );
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let snap = snapshot(&[("B", 10.0), ("A", 10.0)]);
        let selection = top_n(&snap, 1).unwrap();
        assert_eq!(selection.instruments, vec!["A"]);
    }

    #[test]
    fn under_capacity_selects_all_and_reports_shortfall() {
        let snap = snapshot(&[("A", 1.0), ("B", 2.0)]);
        let selection = top_n(&snap, 5).unwrap();
        assert_eq!(selection.instruments, vec!["B", "A"]);
        assert_eq!(selection.shortfall, 3);
        assert!(selection.is_under_capacity());
    }

    #[test]
    fn empty_snapshot_selects_nothing() {
        let snap = snapshot(&[]);
        let selection = top_n(&snap, 3).unwrap();
        assert!(selection.instruments.is_empty());
        assert_eq!(selection.shortfall, 3);
    }

    #[test]
    fn zero_n_is_a_configuration_error() {
        let snap = snapshot(&[("A", 1.0)]);
        assert!(matches!(
            top_n(&snap, 0),
            Err(BitacoreError::InvalidPortfolioSize { n: 0 })
        ));
    }

    proptest! {
        #[test]
        fn all_equal_values_select_lowest_ids(count in 1usize..30, n in 1usize..30) {
            let ids: Vec<String> = (0..count).map(|i| format!("SEC{i:02}")).collect();
            let snap = Snapshot {
                date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                values: ids.iter().map(|id| (id.clone(), 7.0)).collect(),
            };
            let selection = top_n(&snap, n).unwrap();
            let expected: Vec<String> = ids.iter().take(n).cloned().collect();
            prop_assert_eq!(selection.instruments, expected);
        }

        #[test]
        fn selected_values_dominate_the_rest(values in proptest::collection::vec(0.0f64..1000.0, 1..40)) {
            let snap = Snapshot {
                date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                values: values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (format!("SEC{i:02}"), *v))
                    .collect(),
            };
            let selection = top_n(&snap, 5).unwrap();
            let floor = selection
                .instruments
                .iter()
                .map(|id| snap.values[id])
                .fold(f64::INFINITY, f64::min);
            for (id, value) in &snap.values {
                if !selection.instruments.contains(id) {
                    prop_assert!(*value <= floor);
                }
            }
        }
    }
}
