use crate::core::models::filter::ShiftRangeFilter;
use thiserror::Error;

pub const DEFAULT_MAX_STEPS: usize = 10;
pub const DEFAULT_MAX_REGISTRATION_STEPS: usize = 2;
pub const DEFAULT_MIN_POINTS: usize = 2;
pub const DEFAULT_PROBABILITY: f64 = 0.0001;
pub const DEFAULT_STD_CUTOFF: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Parameters of the refinement driver and the clustering engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingConfig {
    /// Dimension labels passed literally to the registration oracle.
    pub root_dimensions: Vec<String>,
    /// Upper bound on refinement steps.
    pub max_steps: usize,
    /// Registration is only attempted on steps below this bound.
    pub max_registration_steps: usize,
    /// Minimum neighborhood size (including the point itself) of a core point.
    pub min_points: usize,
    /// Upper-tail probability of the chi-square neighborhood cutoff.
    pub probability: f64,
    /// Tolerances at or above this value stop the refinement.
    pub std_cutoff: f64,
    /// Chemical-shift windows applied to the input list before grouping.
    pub filters: Vec<ShiftRangeFilter>,
}

#[derive(Default)]
pub struct GroupingConfigBuilder {
    root_dimensions: Option<Vec<String>>,
    max_steps: Option<usize>,
    max_registration_steps: Option<usize>,
    min_points: Option<usize>,
    probability: Option<f64>,
    std_cutoff: Option<f64>,
    filters: Vec<ShiftRangeFilter>,
}

impl GroupingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_dimensions(mut self, labels: Vec<String>) -> Self {
        self.root_dimensions = Some(labels);
        self
    }
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }
    pub fn max_registration_steps(mut self, steps: usize) -> Self {
        self.max_registration_steps = Some(steps);
        self
    }
    pub fn min_points(mut self, n: usize) -> Self {
        self.min_points = Some(n);
        self
    }
    pub fn probability(mut self, p: f64) -> Self {
        self.probability = Some(p);
        self
    }
    pub fn std_cutoff(mut self, cutoff: f64) -> Self {
        self.std_cutoff = Some(cutoff);
        self
    }

    pub fn filter(mut self, filter: ShiftRangeFilter) -> Self {
        self.filters.push(filter);
        self
    }
    pub fn filters(mut self, filters: impl IntoIterator<Item = ShiftRangeFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn build(self) -> Result<GroupingConfig, ConfigError> {
        let root_dimensions = self
            .root_dimensions
            .ok_or(ConfigError::MissingParameter("root_dimensions"))?;
        if root_dimensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "root_dimensions",
                reason: "at least one root dimension is required".to_string(),
            });
        }

        let max_registration_steps = self
            .max_registration_steps
            .unwrap_or(DEFAULT_MAX_REGISTRATION_STEPS);
        if max_registration_steps == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "max_registration_steps",
                reason: "the first step always requires registration".to_string(),
            });
        }

        let min_points = self.min_points.unwrap_or(DEFAULT_MIN_POINTS);
        if min_points == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "min_points",
                reason: "must be at least 1".to_string(),
            });
        }

        let probability = self.probability.unwrap_or(DEFAULT_PROBABILITY);
        if !(probability > 0.0 && probability < 1.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "probability",
                reason: format!("must lie strictly between 0 and 1 (got {})", probability),
            });
        }

        let std_cutoff = self.std_cutoff.unwrap_or(DEFAULT_STD_CUTOFF);
        if !(std_cutoff > 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "std_cutoff",
                reason: format!("must be positive (got {})", std_cutoff),
            });
        }

        Ok(GroupingConfig {
            root_dimensions,
            max_steps: self.max_steps.unwrap_or(DEFAULT_MAX_STEPS),
            max_registration_steps,
            min_points,
            probability,
            std_cutoff,
            filters: self.filters,
        })
    }
}
