use super::error::EngineError;
use crate::core::models::ids::PeakId;
use crate::core::models::peak::Peak;
use crate::core::models::peaklist::PeakList;
use crate::core::models::tolerance::ToleranceMap;
use statrs::distribution::{ChiSquared, ContinuousCDF};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 512;

/// Square root of the upper-tail chi-square quantile for `probability` with
/// `degrees_of_freedom`, i.e. the largest normalized distance still considered
/// part of a neighborhood.
pub fn chi_square_cutoff(probability: f64, degrees_of_freedom: usize) -> Result<f64, EngineError> {
    if degrees_of_freedom == 0 {
        return Err(EngineError::DegenerateTolerances);
    }
    if !(probability > 0.0 && probability < 1.0) {
        return Err(EngineError::Statistics(format!(
            "probability must lie strictly between 0 and 1 (got {})",
            probability
        )));
    }
    let distribution = ChiSquared::new(degrees_of_freedom as f64)
        .map_err(|e| EngineError::Statistics(e.to_string()))?;
    let quantile = distribution.inverse_cdf(1.0 - probability);
    if !quantile.is_finite() {
        return Err(EngineError::Statistics(format!(
            "non-finite chi-square quantile for p={} df={}",
            probability, degrees_of_freedom
        )));
    }
    Ok(quantile.sqrt())
}

/// A chi-square gated neighborhood test for one tolerance map over one
/// dimension schema.
///
/// Every tolerance entry counts towards the degrees of freedom; only entries
/// whose label belongs to the schema contribute to the distance. Non-positive
/// tolerances are floored to [`TOLERANCE_EPSILON`](crate::core::models::tolerance::TOLERANCE_EPSILON).
#[derive(Debug, Clone)]
pub struct RegionQuery {
    axes: Vec<(usize, f64)>,
    cutoff: f64,
}

impl RegionQuery {
    pub fn new(
        tolerances: &ToleranceMap,
        labels: &[String],
        probability: f64,
    ) -> Result<Self, EngineError> {
        let cutoff = chi_square_cutoff(probability, tolerances.len())?;
        let axes = labels
            .iter()
            .enumerate()
            .filter_map(|(idx, label)| {
                tolerances
                    .get(label)
                    .map(|std| (idx, ToleranceMap::floored(std)))
            })
            .collect();
        Ok(Self { axes, cutoff })
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Normalized distance between two peaks of the same schema.
    pub fn distance(&self, a: &Peak, b: &Peak) -> f64 {
        let (a, b) = (a.dimensions(), b.dimensions());
        self.axes
            .iter()
            .map(|&(idx, std)| {
                let delta = (b[idx].value() - a[idx].value()) / std;
                delta * delta
            })
            .sum::<f64>()
            .sqrt()
    }

    pub fn contains(&self, point: &Peak, candidate: &Peak) -> bool {
        self.distance(point, candidate) <= self.cutoff
    }

    /// All peaks of `candidates` within the cutoff of `point`, in list order.
    /// The point itself is included when it belongs to `candidates`.
    pub fn neighbors(&self, point: &Peak, candidates: &PeakList) -> Vec<PeakId> {
        #[cfg(feature = "parallel")]
        if candidates.len() >= PARALLEL_THRESHOLD {
            return candidates
                .ids()
                .par_iter()
                .filter(|&&id| self.contains(point, &candidates[id]))
                .copied()
                .collect();
        }

        candidates
            .iter()
            .filter(|(_, candidate)| self.contains(point, candidate))
            .map(|(id, _)| id)
            .collect()
    }
}

/// One-shot neighborhood lookup; see [`RegionQuery`].
pub fn region_query(
    point: &Peak,
    candidates: &PeakList,
    tolerances: &ToleranceMap,
    probability: f64,
) -> Result<Vec<PeakId>, EngineError> {
    let query = RegionQuery::new(tolerances, candidates.labels(), probability)?;
    Ok(query.neighbors(point, candidates))
}
