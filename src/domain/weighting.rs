//! Weight allocation schemes.

use std::collections::BTreeMap;

use crate::domain::config::WeightingRule;

/// Assign weight fractions to the selected instruments.
///
/// Non-empty results sum to 1.0 within 1e-9; an empty selection yields an
/// empty portfolio and the caller decides whether to warn.
pub fn allocate(rule: WeightingRule, selected: &[String]) -> BTreeMap<String, f64> {
    match rule {
        WeightingRule::Equal => equal_weights(selected),
    }
}

fn equal_weights(selected: &[String]) -> BTreeMap<String, f64> {
    let mut weights = BTreeMap::new();
    if selected.is_empty() {
        return weights;
    }
    let weight = 1.0 / selected.len() as f64;
    for instrument in selected {
        weights.insert(instrument.clone(), weight);
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn two_instruments_split_evenly() {
        let weights = allocate(WeightingRule::Equal, &ids(&["A", "B"]));
        assert_eq!(weights.len(), 2);
        assert_relative_eq!(weights["A"], 0.5);
        assert_relative_eq!(weights["B"], 0.5);
    }

    #[test]
    fn single_instrument_takes_full_weight() {
        let weights = allocate(WeightingRule::Equal, &ids(&["A"]));
        assert_relative_eq!(weights["A"], 1.0);
    }

    #[test]
    fn empty_selection_yields_empty_portfolio() {
        let weights = allocate(WeightingRule::Equal, &[]);
        assert!(weights.is_empty());
    }

    #[test]
    fn three_way_split_still_sums_to_one() {
        let weights = allocate(WeightingRule::Equal, &ids(&["A", "B", "C"]));
        let sum: f64 = weights.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn non_empty_portfolios_sum_to_one(count in 1usize..100) {
            let selected: Vec<String> = (0..count).map(|i| format!("SEC{i:03}")).collect();
            let weights = allocate(WeightingRule::Equal, &selected);
            let sum: f64 = weights.values().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert_eq!(weights.len(), count);
        }
    }
}
