use super::cluster::{Cluster, ClusterLabel};
use super::config::{DEFAULT_MIN_POINTS, DEFAULT_PROBABILITY};
use super::error::EngineError;
use super::region::RegionQuery;
use super::registry::ClusterRegistry;
use crate::core::models::ids::PeakId;
use crate::core::models::peaklist::PeakList;
use crate::core::models::tolerance::ToleranceMap;
use slotmap::SecondaryMap;
use std::collections::HashSet;
use tracing::{debug, instrument, trace};

/// What one clustering pass produced, in terms of the pass's input list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusteringPass {
    /// Labels of the clusters formed in this pass, in discovery order.
    pub clusters: Vec<ClusterLabel>,
    /// Ids of the peaks left in the noise bucket, in list order.
    pub noise: Vec<PeakId>,
}

/// Density clustering with a chi-square gated neighborhood.
///
/// A peak is a core point when its neighborhood (itself included) holds at
/// least `min_points` peaks. Clusters grow through core points; a peak keeps
/// the first cluster that claims it. Peaks never claimed end up in the noise
/// bucket.
#[derive(Debug, Clone, Copy)]
pub struct Dbscan {
    min_points: usize,
    probability: f64,
}

impl Default for Dbscan {
    fn default() -> Self {
        Self {
            min_points: DEFAULT_MIN_POINTS,
            probability: DEFAULT_PROBABILITY,
        }
    }
}

struct PassState {
    visited: HashSet<PeakId>,
    owner: SecondaryMap<PeakId, ClusterLabel>,
}

impl Dbscan {
    pub fn new(min_points: usize, probability: f64) -> Result<Self, EngineError> {
        if min_points == 0 {
            return Err(EngineError::InvalidMinPoints(min_points));
        }
        Ok(Self {
            min_points,
            probability,
        })
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    /// Partitions `peaklist` and registers the clusters plus this pass's
    /// noise bucket in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DegenerateTolerances`] for an empty tolerance map
    /// and [`EngineError::Statistics`] if the cutoff cannot be computed.
    #[instrument(skip_all, name = "dbscan_pass", fields(peaks = peaklist.len()))]
    pub fn run(
        &self,
        peaklist: &PeakList,
        tolerances: &ToleranceMap,
        registry: &mut ClusterRegistry,
    ) -> Result<ClusteringPass, EngineError> {
        if tolerances.is_empty() {
            return Err(EngineError::DegenerateTolerances);
        }
        let query = RegionQuery::new(tolerances, peaklist.labels(), self.probability)?;
        debug!(cutoff = query.cutoff(), "Chi-square neighborhood cutoff.");

        let mut state = PassState {
            visited: HashSet::with_capacity(peaklist.len()),
            owner: SecondaryMap::new(),
        };
        let mut formed = Vec::new();

        for &id in peaklist.ids() {
            if !state.visited.insert(id) {
                continue;
            }
            let neighbors = query.neighbors(&peaklist[id], peaklist);
            if neighbors.len() < self.min_points {
                trace!(?id, neighbors = neighbors.len(), "Peak is not a core point.");
                continue;
            }

            let label = registry.next_label();
            let members = self.expand(id, neighbors, label, peaklist, &query, &mut state);

            let mut cluster = Cluster::new(label, tolerances.clone());
            for member in members {
                cluster.add_member(peaklist[member].clone());
            }
            debug!(label, size = cluster.len(), "Cluster formed.");
            registry.register(cluster);
            formed.push(label);
        }

        let noise: Vec<PeakId> = peaklist
            .ids()
            .iter()
            .copied()
            .filter(|&id| !state.owner.contains_key(id))
            .collect();
        let mut bucket = Cluster::noise(tolerances.clone());
        for &id in &noise {
            bucket.add_member(peaklist[id].clone());
        }
        registry.register(bucket);

        debug!(
            clusters = formed.len(),
            noise = noise.len(),
            "Clustering pass complete."
        );
        Ok(ClusteringPass {
            clusters: formed,
            noise,
        })
    }

    fn expand(
        &self,
        seed: PeakId,
        neighbors: Vec<PeakId>,
        label: ClusterLabel,
        peaklist: &PeakList,
        query: &RegionQuery,
        state: &mut PassState,
    ) -> Vec<PeakId> {
        state.owner.insert(seed, label);
        let mut members = vec![seed];

        let mut queued: HashSet<PeakId> = neighbors.iter().copied().collect();
        let mut queue = neighbors;
        let mut cursor = 0;

        while cursor < queue.len() {
            let candidate = queue[cursor];
            cursor += 1;

            if state.visited.insert(candidate) {
                let reachable = query.neighbors(&peaklist[candidate], peaklist);
                if reachable.len() >= self.min_points {
                    for next in reachable {
                        if queued.insert(next) {
                            queue.push(next);
                        }
                    }
                }
            }

            if !state.owner.contains_key(candidate) {
                state.owner.insert(candidate, label);
                members.push(candidate);
            }
        }

        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::format::PeakListFormat;
    use crate::core::models::peak::Peak;
    use crate::engine::cluster::NOISE_LABEL;

    fn list(points: &[(f64, f64)]) -> PeakList {
        let labels = vec!["X".to_string(), "Y".to_string()];
        PeakList::from_peaks(
            "TEST",
            labels.clone(),
            PeakListFormat::Json,
            points
                .iter()
                .map(|&(x, y)| Peak::unassigned(&labels, &[x, y], Vec::new()).unwrap()),
        )
        .unwrap()
        .with_source("test.json")
    }

    fn tolerances(entries: &[(&str, f64)]) -> ToleranceMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn two_close_peaks_cluster_and_far_peak_is_noise() {
        let peaks = list(&[(0.0, 0.0), (1.0, 1.0), (100.0, 100.0)]);
        let ids = peaks.ids().to_vec();
        let mut registry = ClusterRegistry::new("test.json");

        let pass = Dbscan::default()
            .run(&peaks, &tolerances(&[("X", 1.0), ("Y", 1.0)]), &mut registry)
            .unwrap();

        assert_eq!(pass.clusters, vec![1]);
        assert_eq!(pass.noise, vec![ids[2]]);
        assert_eq!(registry.get(1).map(Cluster::len), Some(2));
        assert_eq!(registry.get(NOISE_LABEL).map(Cluster::len), Some(1));
    }

    #[test]
    fn identical_peaks_cluster_under_epsilon_tolerance() {
        let peaks = list(&[(7.25, 118.0), (7.25, 118.0)]);
        let mut registry = ClusterRegistry::new("test.json");

        let pass = Dbscan::default()
            .run(&peaks, &tolerances(&[("X", 1e-7)]), &mut registry)
            .unwrap();

        assert_eq!(pass.clusters.len(), 1);
        assert!(pass.noise.is_empty());
        assert_eq!(registry.get(1).map(Cluster::len), Some(2));
    }

    #[test]
    fn every_peak_lands_in_exactly_one_bucket() {
        let peaks = list(&[
            (0.0, 0.0),
            (0.5, 0.2),
            (20.0, 20.0),
            (1.0, 0.9),
            (20.4, 19.5),
            (50.0, -3.0),
            (80.0, 80.0),
        ]);
        let mut registry = ClusterRegistry::new("test.json");
        let pass = Dbscan::default()
            .run(&peaks, &tolerances(&[("X", 1.0), ("Y", 1.0)]), &mut registry)
            .unwrap();

        let total: usize = pass
            .clusters
            .iter()
            .filter_map(|&label| registry.get(label))
            .map(Cluster::len)
            .sum::<usize>()
            + pass.noise.len();
        assert_eq!(total, peaks.len());
        assert_eq!(pass.clusters, vec![1, 2]);
        assert_eq!(pass.noise.len(), 2);
    }

    #[test]
    fn border_peak_seen_first_joins_later_cluster() {
        let peaks = list(&[(0.0, 0.0), (3.5, 0.0), (5.0, 0.0), (6.0, 0.0)]);
        let ids = peaks.ids().to_vec();
        let mut registry = ClusterRegistry::new("test.json");

        let pass = Dbscan::new(3, 1e-4)
            .unwrap()
            .run(&peaks, &tolerances(&[("X", 1.0)]), &mut registry)
            .unwrap();

        assert!(pass.noise.is_empty());
        let cluster = registry.get(1).unwrap();
        assert_eq!(cluster.coordinates("X"), Some(vec![3.5, 0.0, 5.0, 6.0]));
        assert!(!pass.noise.contains(&ids[0]));
    }

    #[test]
    fn labels_continue_across_passes_on_same_registry() {
        let mut registry = ClusterRegistry::new("test.json");
        let first = list(&[(0.0, 0.0), (0.1, 0.1), (40.0, 40.0)]);
        let second = list(&[(40.0, 40.0), (40.2, 40.1)]);
        let tol = tolerances(&[("X", 1.0), ("Y", 1.0)]);

        let pass_one = Dbscan::default().run(&first, &tol, &mut registry).unwrap();
        let pass_two = Dbscan::default().run(&second, &tol, &mut registry).unwrap();

        assert_eq!(pass_one.clusters, vec![1]);
        assert_eq!(pass_two.clusters, vec![2]);
        assert!(registry.noise().is_some_and(Cluster::is_empty));
    }

    #[test]
    fn empty_tolerance_map_is_rejected() {
        let peaks = list(&[(0.0, 0.0), (100.0, 100.0)]);
        let mut registry = ClusterRegistry::new("test.json");
        let result = Dbscan::default().run(&peaks, &ToleranceMap::new(), &mut registry);
        assert!(matches!(result, Err(EngineError::DegenerateTolerances)));
        assert!(registry.is_empty());
    }

    #[test]
    fn zero_min_points_is_rejected() {
        assert!(matches!(
            Dbscan::new(0, 1e-4),
            Err(EngineError::InvalidMinPoints(0))
        ));
    }
}
