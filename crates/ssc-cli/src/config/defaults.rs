use ssc::core::io::format::PeakListFormat;
use ssc::core::models::filter::ShiftRangeFilter;
use ssc::engine::config::{
    DEFAULT_MAX_REGISTRATION_STEPS, DEFAULT_MAX_STEPS, DEFAULT_MIN_POINTS, DEFAULT_PROBABILITY,
    DEFAULT_STD_CUTOFF,
};

/// Suffix appended to the peak list file name to form the result file name.
pub const RESULT_FILE_SUFFIX: &str = "_grouping_result.json";

pub struct DefaultsConfig {
    pub format: PeakListFormat,
    pub max_steps: usize,
    pub max_registration_steps: usize,
    pub min_points: usize,
    pub probability: f64,
    pub std_cutoff: f64,
    pub filters: Vec<ShiftRangeFilter>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: PeakListFormat::Json,
            max_steps: DEFAULT_MAX_STEPS,
            max_registration_steps: DEFAULT_MAX_REGISTRATION_STEPS,
            min_points: DEFAULT_MIN_POINTS,
            probability: DEFAULT_PROBABILITY,
            std_cutoff: DEFAULT_STD_CUTOFF,
            filters: ShiftRangeFilter::backbone_defaults(),
        }
    }
}
