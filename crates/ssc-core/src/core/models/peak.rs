use super::dimension::Dimension;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PeakError {
    #[error("Expected {expected} chemical shifts, found {found}")]
    ShiftCount { expected: usize, found: usize },

    #[error("Expected {expected} assignments, found {found}")]
    AssignmentCount { expected: usize, found: usize },

    #[error("Peak dimensions {found:?} do not match peak list dimensions {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// A single experimental peak: one [`Dimension`] per configured label plus any
/// extra scalar attributes (e.g., intensity) that take no part in clustering.
///
/// Two peaks with identical coordinates are still distinct entities; identity
/// is tracked by the [`PeakId`](super::ids::PeakId) of the owning list, never by
/// value comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    dimensions: Vec<Dimension>,
    extra: Vec<f64>,
}

impl Peak {
    /// Builds a peak from parallel label, assignment and shift sequences.
    ///
    /// # Errors
    ///
    /// Returns [`PeakError`] if `assignments` or `shifts` do not have exactly
    /// one entry per label.
    pub fn new<S: AsRef<str>>(
        labels: &[String],
        assignments: &[S],
        shifts: &[f64],
        extra: Vec<f64>,
    ) -> Result<Self, PeakError> {
        if assignments.len() != labels.len() {
            return Err(PeakError::AssignmentCount {
                expected: labels.len(),
                found: assignments.len(),
            });
        }
        if shifts.len() != labels.len() {
            return Err(PeakError::ShiftCount {
                expected: labels.len(),
                found: shifts.len(),
            });
        }

        let dimensions = labels
            .iter()
            .zip(assignments)
            .zip(shifts)
            .enumerate()
            .map(|(idx, ((label, assignment), &shift))| {
                Dimension::new(idx + 1, label, shift, assignment.as_ref())
            })
            .collect();

        Ok(Self { dimensions, extra })
    }

    /// Builds an unassigned peak (every assignment is `"?"`).
    pub fn unassigned(labels: &[String], shifts: &[f64], extra: Vec<f64>) -> Result<Self, PeakError> {
        let assignments = vec!["?"; labels.len()];
        Self::new(labels, &assignments, shifts, extra)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, label: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.label() == label)
    }

    pub fn value(&self, label: &str) -> Option<f64> {
        self.dimension(label).map(Dimension::value)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(Dimension::label)
    }

    pub fn shifts(&self) -> Vec<f64> {
        self.dimensions.iter().map(Dimension::value).collect()
    }

    pub fn assignments(&self) -> Vec<String> {
        self.dimensions
            .iter()
            .map(|d| d.assignment().to_string())
            .collect()
    }

    pub fn extra(&self) -> &[f64] {
        &self.extra
    }

    pub(crate) fn matches_labels(&self, labels: &[String]) -> bool {
        self.dimensions.len() == labels.len() && self.labels().zip(labels).all(|(a, b)| a == b)
    }
}
