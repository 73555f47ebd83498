use crate::core::io::result::{ClusterRecord, PeakRecord};
use crate::core::models::peak::Peak;
use crate::core::models::tolerance::ToleranceMap;

pub type ClusterLabel = i64;

/// Label reserved for the bucket of peaks that did not join any cluster.
pub const NOISE_LABEL: ClusterLabel = -1;

/// A group of peaks believed to belong to one spin system.
///
/// Members are owned copies in discovery order; a cluster outlives the
/// working peak list of the pass that formed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    label: ClusterLabel,
    tolerances: ToleranceMap,
    members: Vec<Peak>,
}

impl Cluster {
    pub fn new(label: ClusterLabel, tolerances: ToleranceMap) -> Self {
        Self {
            label,
            tolerances,
            members: Vec::new(),
        }
    }

    pub fn noise(tolerances: ToleranceMap) -> Self {
        Self::new(NOISE_LABEL, tolerances)
    }

    pub fn label(&self) -> ClusterLabel {
        self.label
    }

    pub fn is_noise(&self) -> bool {
        self.label == NOISE_LABEL
    }

    pub fn tolerances(&self) -> &ToleranceMap {
        &self.tolerances
    }

    pub fn members(&self) -> &[Peak] {
        &self.members
    }

    pub fn add_member(&mut self, peak: Peak) {
        self.members.push(peak);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Chemical shifts of every member along `label`; `None` if the label is
    /// not part of the members' schema.
    pub fn coordinates(&self, label: &str) -> Option<Vec<f64>> {
        self.members.iter().map(|peak| peak.value(label)).collect()
    }

    pub fn assignments(&self) -> Vec<Vec<String>> {
        self.members.iter().map(Peak::assignments).collect()
    }

    pub fn to_record(&self) -> ClusterRecord {
        ClusterRecord {
            label: self.label,
            peaks: self
                .members
                .iter()
                .enumerate()
                .map(|(index, peak)| PeakRecord {
                    dimensions: peak.shifts(),
                    assignment: peak.assignments(),
                    index,
                })
                .collect(),
            stds: self.tolerances.clone(),
        }
    }
}
