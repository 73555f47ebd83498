use super::peak::Peak;
use serde::{Deserialize, Serialize};

/// Accepts peaks whose chemical shift for `label` lies within `[min, max]`.
/// Peaks without the label are always accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRangeFilter {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

impl ShiftRangeFilter {
    pub fn new(label: &str, min: f64, max: f64) -> Self {
        Self {
            label: label.to_string(),
            min,
            max,
        }
    }

    pub fn accepts(&self, peak: &Peak) -> bool {
        match peak.value(&self.label) {
            Some(value) => self.min <= value && value <= self.max,
            None => true,
        }
    }

    /// Backbone sanity ranges applied to freshly parsed peak lists.
    pub fn backbone_defaults() -> Vec<Self> {
        vec![
            Self::new("CA", 35.0, 75.0),
            Self::new("N", 90.0, 140.0),
            Self::new("HN", 0.0, 20.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(labels: &[&str], shifts: &[f64]) -> Peak {
        let labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        Peak::unassigned(&labels, shifts, Vec::new()).unwrap()
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let filter = ShiftRangeFilter::new("N", 90.0, 140.0);
        assert!(filter.accepts(&peak(&["N"], &[90.0])));
        assert!(filter.accepts(&peak(&["N"], &[140.0])));
        assert!(!filter.accepts(&peak(&["N"], &[140.1])));
        assert!(!filter.accepts(&peak(&["N"], &[89.9])));
    }

    #[test]
    fn peaks_without_the_label_are_accepted() {
        let filter = ShiftRangeFilter::new("CA", 35.0, 75.0);
        assert!(filter.accepts(&peak(&["HN", "N"], &[8.0, 120.0])));
    }

    #[test]
    fn backbone_defaults_cover_ca_n_and_hn() {
        let labels: Vec<_> = ShiftRangeFilter::backbone_defaults()
            .into_iter()
            .map(|f| f.label)
            .collect();
        assert_eq!(labels, vec!["CA", "N", "HN"]);
    }
}
