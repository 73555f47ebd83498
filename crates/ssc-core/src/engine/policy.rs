use super::state::ToleranceHistory;
use crate::core::models::tolerance::{TOLERANCE_EPSILON, ToleranceMap};

/// How tolerances move between refinement steps.
pub trait TolerancePolicy {
    /// Tolerances for the next pass given the previous pass's tolerances and a
    /// fresh registration estimate. `previous` is empty before the first pass.
    fn refine(&self, previous: &ToleranceMap, fresh: &ToleranceMap) -> ToleranceMap;

    /// Tolerances for the next pass when no registration estimate is used.
    fn inflate(&self, current: &ToleranceMap, history: &ToleranceHistory) -> ToleranceMap;
}

/// Never lets a tolerance shrink while registration is trusted, and widens
/// each dimension by its smallest non-zero observed value afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicPolicy;

impl TolerancePolicy for MonotonicPolicy {
    fn refine(&self, previous: &ToleranceMap, fresh: &ToleranceMap) -> ToleranceMap {
        if previous.is_empty() {
            return fresh.clone();
        }
        previous
            .iter()
            .map(|(label, old)| {
                let new = fresh.get(label).unwrap_or(old);
                (label, old.max(new))
            })
            .collect()
    }

    fn inflate(&self, current: &ToleranceMap, history: &ToleranceHistory) -> ToleranceMap {
        current
            .iter()
            .map(|(label, std)| {
                let increment = history.min_nonzero(label).unwrap_or(TOLERANCE_EPSILON);
                (label, std + increment)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> ToleranceMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn refine_takes_fresh_values_on_first_pass() {
        let fresh = map(&[("HN", 0.02), ("N", 0.3)]);
        assert_eq!(MonotonicPolicy.refine(&ToleranceMap::new(), &fresh), fresh);
    }

    #[test]
    fn refine_never_lowers_a_tolerance() {
        let previous = map(&[("HN", 0.02), ("N", 0.3)]);
        let fresh = map(&[("HN", 0.05), ("N", 0.1), ("CA", 0.4)]);
        let refined = MonotonicPolicy.refine(&previous, &fresh);
        assert_eq!(refined, map(&[("HN", 0.05), ("N", 0.3)]));
    }

    #[test]
    fn refine_keeps_previous_value_for_missing_labels() {
        let previous = map(&[("HN", 0.02), ("N", 0.3)]);
        let refined = MonotonicPolicy.refine(&previous, &map(&[("HN", 0.01)]));
        assert_eq!(refined, previous);
    }

    #[test]
    fn inflate_adds_smallest_nonzero_history() {
        let mut history = ToleranceHistory::new();
        history.record(&map(&[("HN", 0.03), ("N", 0.2)]));
        history.record(&map(&[("HN", 0.01), ("N", 0.0)]));

        let inflated = MonotonicPolicy.inflate(&map(&[("HN", 0.03), ("N", 0.2)]), &history);
        assert!((inflated.get("HN").unwrap() - 0.04).abs() < 1e-12);
        assert!((inflated.get("N").unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn inflate_falls_back_to_epsilon_without_history() {
        let inflated = MonotonicPolicy.inflate(&map(&[("C", 0.1)]), &ToleranceHistory::new());
        assert_eq!(inflated.get("C"), Some(0.1 + TOLERANCE_EPSILON));
    }
}
