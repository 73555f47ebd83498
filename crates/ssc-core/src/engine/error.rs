use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Peak list cannot be registered: {reason}")]
    UnregistrableInput { reason: String },

    #[error("Tolerance map is empty; clustering would collapse every peak into one cluster")]
    DegenerateTolerances,

    #[error("Minimum cluster size must be at least 1 (got {0})")]
    InvalidMinPoints(usize),

    #[error("Statistical cutoff could not be computed: {0}")]
    Statistics(String),

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
