//! Measurement counts and result validation.
//!
//! Bitstring ordering: the rightmost character is classical bit 0, so for a
//! two-bit register `"01"` means bit 0 read `1` and bit 1 read `0`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use qcanvas_ir::Circuit;

use crate::error::{HalError, HalResult};

/// Histogram of measured bitstrings.
///
/// Keys are kept sorted so serialized output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create counts from (bitstring, count) pairs; duplicates are summed.
    pub fn from_pairs(iter: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        let mut counts = Self::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }

    /// Add `count` occurrences of a bitstring.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_default() += count;
    }

    /// Count for a bitstring, zero if never observed.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over (bitstring, count) pairs in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Observed bitstrings in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.counts.keys()
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The most frequent bitstring; ties go to the lexicographically smallest.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
    }

    /// Empirical probability of each bitstring.
    #[allow(clippy::cast_precision_loss)]
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total_shots() as f64;
        if total == 0.0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    /// Pairs sorted by count, descending; ties in bitstring order.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut items: Vec<_> = self.counts.iter().collect();
        items.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        items
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if counts are empty.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Check a backend's output against the circuits it was given.
///
/// One [`Counts`] per circuit, every key exactly as wide as that circuit's
/// classical register over `{0,1}`, and every histogram summing to `shots`.
/// A shortfall in shots is rejected rather than passed on as partial data.
pub fn validate_results(circuits: &[Circuit], results: &[Counts], shots: u32) -> HalResult<()> {
    if circuits.len() != results.len() {
        return Err(HalError::ResultMismatch(format!(
            "submitted {} circuits but received {} results",
            circuits.len(),
            results.len()
        )));
    }

    for (i, (circuit, counts)) in circuits.iter().zip(results).enumerate() {
        let width = circuit.num_clbits();
        if let Some(bad) = counts
            .keys()
            .find(|k| k.len() != width || !k.bytes().all(|b| b == b'0' || b == b'1'))
        {
            return Err(HalError::ResultMismatch(format!(
                "result {i}: bitstring '{bad}' is not a {width}-bit binary string"
            )));
        }
        let total = counts.total_shots();
        if total != u64::from(shots) {
            return Err(HalError::ResultMismatch(format!(
                "result {i}: counts sum to {total}, expected {shots} shots"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_basic() {
        let mut counts = Counts::new();
        counts.insert("00", 500);
        counts.insert("11", 400);
        counts.insert("11", 100);

        assert_eq!(counts.get("00"), 500);
        assert_eq!(counts.get("11"), 500);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 1000);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_counts_probabilities() {
        let counts = Counts::from_pairs([("00", 300), ("01", 200), ("10", 300), ("11", 200)]);
        let probs = counts.probabilities();
        assert!((probs["00"] - 0.3).abs() < 1e-10);
        assert!((probs["01"] - 0.2).abs() < 1e-10);
        assert!(Counts::new().probabilities().is_empty());
    }

    #[test]
    fn test_counts_ordering() {
        let counts = Counts::from_pairs([("11", 5), ("00", 5), ("01", 9)]);
        assert_eq!(counts.most_frequent(), Some((&"01".to_string(), &9)));
        let sorted: Vec<_> = counts.sorted().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(sorted, vec!["01", "00", "11"]);
        assert_eq!(
            serde_json::to_string(&counts).unwrap(),
            r#"{"00":5,"01":9,"11":5}"#
        );
    }

    #[test]
    fn test_validate_ok() {
        let circuits = vec![Circuit::bell().unwrap()];
        let results = vec![Counts::from_pairs([("00", 60), ("11", 40)])];
        assert!(validate_results(&circuits, &results, 100).is_ok());
    }

    #[test]
    fn test_validate_count_mismatch() {
        let circuits = vec![Circuit::bell().unwrap(), Circuit::bell().unwrap()];
        let results = vec![Counts::from_pairs([("00", 100)])];
        let err = validate_results(&circuits, &results, 100).unwrap_err();
        assert!(matches!(err, HalError::ResultMismatch(_)));
    }

    #[test]
    fn test_validate_shot_shortfall() {
        let circuits = vec![Circuit::bell().unwrap()];
        let results = vec![Counts::from_pairs([("00", 99)])];
        assert!(validate_results(&circuits, &results, 100).is_err());
    }

    #[test]
    fn test_validate_bad_width() {
        let circuits = vec![Circuit::bell().unwrap()];
        let results = vec![Counts::from_pairs([("000", 100)])];
        assert!(validate_results(&circuits, &results, 100).is_err());
    }
}
