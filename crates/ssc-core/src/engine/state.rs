use crate::core::models::tolerance::ToleranceMap;
use std::collections::BTreeMap;

/// Every standard deviation the oracle reported, per dimension label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToleranceHistory {
    samples: BTreeMap<String, Vec<f64>>,
}

impl ToleranceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stds: &ToleranceMap) {
        for (label, std) in stds.iter() {
            self.samples.entry(label.to_string()).or_default().push(std);
        }
    }

    pub fn samples(&self, label: &str) -> &[f64] {
        self.samples.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Smallest non-zero value ever recorded for `label`.
    pub fn min_nonzero(&self, label: &str) -> Option<f64> {
        self.samples(label)
            .iter()
            .copied()
            .filter(|&std| std != 0.0)
            .min_by(f64::total_cmp)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Mutable state of one refinement run.
#[derive(Debug, Clone)]
pub struct RefinementState {
    pub step: usize,
    pub using_registration: bool,
    /// Tolerances of the last clustering pass.
    pub previous: ToleranceMap,
    /// Tolerances for the pass about to run.
    pub current: ToleranceMap,
    pub history: ToleranceHistory,
}

impl Default for RefinementState {
    fn default() -> Self {
        Self {
            step: 0,
            using_registration: true,
            previous: ToleranceMap::new(),
            current: ToleranceMap::new(),
            history: ToleranceHistory::new(),
        }
    }
}

impl RefinementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches registration off once the step budget for it is spent.
    pub fn enter_step(&mut self, step: usize, max_registration_steps: usize) {
        self.step = step;
        if step >= max_registration_steps {
            self.using_registration = false;
        }
    }

    pub fn commit(&mut self) {
        self.previous = self.current.clone();
    }
}
