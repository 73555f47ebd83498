use std::fmt;

const UNASSIGNED_MARKER: &str = "?";

/// One labeled chemical-shift measurement of a peak.
///
/// A dimension is immutable once created; peaks expose their dimensions only
/// through shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    id: usize,          // 1-based position within the owning peak
    label: String,      // Dimension label (e.g., "HN", "N", "CA")
    value: f64,         // Chemical shift in ppm
    assignment: String, // Assignment string; "?" or "" when unassigned
}

impl Dimension {
    pub fn new(id: usize, label: &str, value: f64, assignment: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
            value,
            assignment: assignment.to_string(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn assignment(&self) -> &str {
        &self.assignment
    }

    pub fn is_assigned(&self) -> bool {
        !self.assignment.is_empty() && self.assignment != UNASSIGNED_MARKER
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.id, self.assignment, self.value)
    }
}
