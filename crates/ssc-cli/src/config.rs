pub mod defaults;

use crate::cli::GroupArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use serde::Deserialize;
use ssc::core::io::format::PeakListFormat;
use ssc::core::models::filter::ShiftRangeFilter;
use ssc::engine::config::{GroupingConfig, GroupingConfigBuilder};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPeakListConfig {
    format: Option<String>,
    #[serde(rename = "spectrum-type")]
    spectrum_type: Option<String>,
    dimensions: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRegistrationConfig {
    executable: Option<PathBuf>,
    #[serde(rename = "timeout-secs")]
    timeout_secs: Option<u64>,
    #[serde(rename = "root-dimensions")]
    root_dimensions: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRefinementConfig {
    #[serde(rename = "max-steps")]
    max_steps: Option<usize>,
    #[serde(rename = "max-registration-steps")]
    max_registration_steps: Option<usize>,
    #[serde(rename = "min-points")]
    min_points: Option<usize>,
    probability: Option<f64>,
    #[serde(rename = "std-cutoff")]
    std_cutoff: Option<f64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialFilter {
    label: String,
    min: f64,
    max: f64,
}

impl From<PartialFilter> for ShiftRangeFilter {
    fn from(p: PartialFilter) -> Self {
        ShiftRangeFilter::new(&p.label, p.min, p.max)
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialGroupConfig {
    peaklist: Option<PartialPeakListConfig>,
    registration: Option<PartialRegistrationConfig>,
    grouping: Option<PartialRefinementConfig>,
    filters: Option<Vec<PartialFilter>>,
}

/// Everything the `group` command needs after file, CLI and defaults are merged.
#[derive(Debug)]
pub struct GroupSettings {
    pub peaklist_path: PathBuf,
    pub format: PeakListFormat,
    pub spectrum_type: String,
    pub labels: Vec<String>,
    pub executable: PathBuf,
    pub timeout: Option<Duration>,
    pub result_dir: Option<PathBuf>,
    pub view: bool,
    pub grouping: GroupingConfig,
}

impl PartialGroupConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &GroupArgs) -> Result<GroupSettings> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let peaklist_config = self.peaklist.take().unwrap_or_default();
        let registration_config = self.registration.take().unwrap_or_default();
        let refinement_config = self.grouping.take().unwrap_or_default();

        let format = match (args.format, peaklist_config.format) {
            (Some(format), _) => format,
            (None, Some(name)) => parse_value("peaklist.format", &name)?,
            (None, None) => defaults.format,
        };
        let spectrum_type = args
            .spectrum_type
            .clone()
            .or(peaklist_config.spectrum_type)
            .ok_or_else(|| required("peaklist.spectrum-type", "--spectrum-type"))?;
        let labels = non_empty_or(&args.dims, peaklist_config.dimensions)
            .ok_or_else(|| required("peaklist.dimensions", "--dims"))?;
        let root_dimensions = non_empty_or(&args.root_dims, registration_config.root_dimensions)
            .ok_or_else(|| required("registration.root-dimensions", "--root-dims"))?;
        let executable = args
            .registration
            .clone()
            .or(registration_config.executable)
            .ok_or_else(|| required("registration.executable", "--registration"))?;
        let timeout = args
            .timeout
            .or(registration_config.timeout_secs)
            .map(Duration::from_secs);

        let filters = if args.no_filters {
            Vec::new()
        } else {
            self.filters
                .take()
                .map(|filters| filters.into_iter().map(Into::into).collect())
                .unwrap_or(defaults.filters)
        };

        let grouping = GroupingConfigBuilder::new()
            .root_dimensions(root_dimensions)
            .max_steps(
                args.max_steps
                    .or(refinement_config.max_steps)
                    .unwrap_or(defaults.max_steps),
            )
            .max_registration_steps(
                args.max_registration_steps
                    .or(refinement_config.max_registration_steps)
                    .unwrap_or(defaults.max_registration_steps),
            )
            .min_points(refinement_config.min_points.unwrap_or(defaults.min_points))
            .probability(refinement_config.probability.unwrap_or(defaults.probability))
            .std_cutoff(refinement_config.std_cutoff.unwrap_or(defaults.std_cutoff))
            .filters(filters)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(GroupSettings {
            peaklist_path: args.peaklist.clone(),
            format,
            spectrum_type,
            labels,
            executable,
            timeout,
            result_dir: args.result.clone(),
            view: args.view,
            grouping,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "peaklist.format" => {
                    let format: PeakListFormat = parse_value(key, value_str)?;
                    self.peaklist.get_or_insert_with(Default::default).format =
                        Some(format.name().to_string());
                }
                "peaklist.spectrum-type" => {
                    self.peaklist
                        .get_or_insert_with(Default::default)
                        .spectrum_type = Some(value_str.to_string());
                }
                "registration.executable" => {
                    self.registration
                        .get_or_insert_with(Default::default)
                        .executable = Some(PathBuf::from(value_str));
                }
                "registration.timeout-secs" => {
                    self.registration
                        .get_or_insert_with(Default::default)
                        .timeout_secs = Some(parse_value(key, value_str)?);
                }
                "grouping.max-steps" => {
                    self.grouping.get_or_insert_with(Default::default).max_steps =
                        Some(parse_value(key, value_str)?);
                }
                "grouping.max-registration-steps" => {
                    self.grouping
                        .get_or_insert_with(Default::default)
                        .max_registration_steps = Some(parse_value(key, value_str)?);
                }
                "grouping.min-points" => {
                    self.grouping.get_or_insert_with(Default::default).min_points =
                        Some(parse_value(key, value_str)?);
                }
                "grouping.probability" => {
                    self.grouping.get_or_insert_with(Default::default).probability =
                        Some(parse_value(key, value_str)?);
                }
                "grouping.std-cutoff" => {
                    self.grouping.get_or_insert_with(Default::default).std_cutoff =
                        Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn non_empty_or(cli: &[String], file: Option<Vec<String>>) -> Option<Vec<String>> {
    if cli.is_empty() {
        file.filter(|labels| !labels.is_empty())
    } else {
        Some(cli.to_vec())
    }
}

fn required(key: &str, flag: &str) -> CliError {
    CliError::Config(format!(
        "A value for '{}' is required either in the config file or via {}.",
        key, flag
    ))
}
