//! Provenance ledger: which named leaf produced what share of a value's
//! variance.

use std::collections::BTreeMap;
use std::fmt;

use mt_core::Real;

/// Mapping from leaf label to its fractional share of the output variance.
///
/// A leaf carries a single self-entry of `1.0`; constants carry nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contributions(BTreeMap<String, Real>);

impl Contributions {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger of a leaf variable.
    pub fn leaf(label: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(label.into(), 1.0);
        Self(map)
    }

    /// Weighted merge: every label of either ledger, each share summed over
    /// the ledgers that contain it after scaling by that ledger's weight.
    pub fn merge(weight_a: Real, a: &Contributions, weight_b: Real, b: &Contributions) -> Self {
        Self::merge_all([(weight_a, a), (weight_b, b)])
    }

    /// Merge any number of weighted ledgers.
    pub fn merge_all<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (Real, &'a Contributions)>,
    {
        let mut merged = BTreeMap::new();
        for (weight, ledger) in parts {
            for (label, share) in &ledger.0 {
                *merged.entry(label.clone()).or_insert(0.0) += weight * share;
            }
        }
        Self(merged)
    }

    /// Share attributed to `label`, if present.
    pub fn get(&self, label: &str) -> Option<Real> {
        self.0.get(label).copied()
    }

    /// Sum of all shares (1 for any value with nonzero variance).
    pub fn total(&self) -> Real {
        self.0.values().sum()
    }

    /// Number of leaves in the ledger.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no leaf contributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(label, share)` in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Real)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// `true` if any share is NaN.
    pub fn is_indeterminate(&self) -> bool {
        self.0.values().any(|v| v.is_nan())
    }
}

impl fmt::Display for Contributions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (label, share)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}: {share}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn merge_aggregates_duplicate_labels() {
        let x = Contributions::leaf("x");
        let y = Contributions::leaf("y");
        let xy = Contributions::merge(0.25, &x, 0.75, &y);
        let again = Contributions::merge(0.5, &xy, 0.5, &x);
        assert_abs_diff_eq!(again.get("x").unwrap(), 0.625);
        assert_abs_diff_eq!(again.get("y").unwrap(), 0.375);
        assert_abs_diff_eq!(again.total(), 1.0);
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn display_in_label_order() {
        let c = Contributions::merge(0.5, &Contributions::leaf("b"), 0.5, &Contributions::leaf("a"));
        assert_eq!(c.to_string(), "{a: 0.5, b: 0.5}");
    }
}
