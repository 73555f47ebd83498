use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smallest standard deviation used in place of a zero tolerance.
pub const TOLERANCE_EPSILON: f64 = 1e-7;

/// Per-dimension standard deviations keyed by dimension label.
///
/// Only labels present in the map take part in distance computations; labels
/// absent from it are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToleranceMap(BTreeMap<String, f64>);

impl ToleranceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, std: f64) -> Option<f64> {
        self.0.insert(label.to_string(), std)
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, &std)| (label.as_str(), std))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `std` with non-positive values replaced by [`TOLERANCE_EPSILON`].
    pub fn floored(std: f64) -> f64 {
        if std > 0.0 { std } else { TOLERANCE_EPSILON }
    }

    /// True if any tolerance is at or above `cutoff`.
    pub fn any_at_or_above(&self, cutoff: f64) -> bool {
        self.0.values().any(|&std| std >= cutoff)
    }
}

impl FromIterator<(String, f64)> for ToleranceMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ToleranceMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, std)| (label.to_string(), std))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, f64>> for ToleranceMap {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self(map)
    }
}
