use super::cluster::{Cluster, ClusterLabel, NOISE_LABEL};
use crate::core::io::result::ResultDocument;
use std::collections::BTreeMap;

/// Every cluster found across all passes against one original peak list.
///
/// Labels of non-noise clusters are never reused: each new cluster receives the
/// label after the highest one ever registered, starting at 1. The noise
/// bucket occupies a single slot that each pass overwrites.
///
/// A registry is owned by one driver at a time; concurrent runs against the
/// same source must use separate registries or serialize access externally.
#[derive(Debug, Clone)]
pub struct ClusterRegistry {
    source: String,
    clusters: BTreeMap<ClusterLabel, Cluster>,
    noise: Option<Cluster>,
}

impl ClusterRegistry {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            clusters: BTreeMap::new(),
            noise: None,
        }
    }

    /// Identifier of the original peak list this registry belongs to.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn next_label(&self) -> ClusterLabel {
        self.clusters
            .keys()
            .next_back()
            .map_or(1, |&highest| highest.max(0) + 1)
    }

    /// Stores a finished cluster under its label. Registering the noise
    /// bucket replaces the previous one; the replaced cluster is returned.
    pub fn register(&mut self, cluster: Cluster) -> Option<Cluster> {
        if cluster.label() == NOISE_LABEL {
            self.noise.replace(cluster)
        } else {
            self.clusters.insert(cluster.label(), cluster)
        }
    }

    pub fn get(&self, label: ClusterLabel) -> Option<&Cluster> {
        if label == NOISE_LABEL {
            self.noise.as_ref()
        } else {
            self.clusters.get(&label)
        }
    }

    /// Non-noise clusters in ascending label order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    pub fn noise(&self) -> Option<&Cluster> {
        self.noise.as_ref()
    }

    /// Number of non-noise clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.noise.is_none()
    }

    pub fn clustered_peak_count(&self) -> usize {
        self.clusters.values().map(Cluster::len).sum()
    }

    /// The result document: non-noise clusters by label, then the noise bucket.
    pub fn to_document(&self) -> ResultDocument {
        ResultDocument::new(
            self.clusters
                .values()
                .chain(self.noise.iter())
                .map(Cluster::to_record)
                .collect(),
        )
    }
}
