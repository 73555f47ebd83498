use clap::{Args, Parser, Subcommand};
use ssc::core::io::format::PeakListFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "SSC Developers",
    version,
    about = "SSC CLI - Spin System Creator: groups the peaks of a single NMR peak list into spin systems.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Group the peaks of a peak list into spin systems.
    Group(GroupArgs),
    /// Re-write a peak list in another format.
    Convert(ConvertArgs),
    /// Summarize a grouping result document.
    Inspect(InspectArgs),
}

/// Arguments for the `group` subcommand.
#[derive(Args, Debug)]
pub struct GroupArgs {
    // --- Peak List ---
    /// Path to the peak list file.
    #[arg(short, long = "peaklist", required = true, value_name = "PATH")]
    pub peaklist: PathBuf,

    /// Peak list format (sparky, autoassign, json, cstable).
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<PeakListFormat>,

    /// Spectrum type of the experiment (e.g., HSQC, HNCO).
    #[arg(short = 't', long, value_name = "TYPE")]
    pub spectrum_type: Option<String>,

    /// Comma-separated dimension labels, in column order.
    #[arg(short, long, value_name = "LABELS", value_delimiter = ',')]
    pub dims: Vec<String>,

    /// Comma-separated root dimension labels passed to registration as-is.
    #[arg(short, long = "root-dims", value_name = "LABELS", value_delimiter = ',')]
    pub root_dims: Vec<String>,

    // --- Registration ---
    /// Path to the registration algorithm executable.
    #[arg(long = "registration", value_name = "PATH")]
    pub registration: Option<PathBuf>,

    /// Abandon a registration call after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    // --- Refinement Overrides ---
    /// Override the maximum number of refinement steps.
    #[arg(long, value_name = "INT")]
    pub max_steps: Option<usize>,

    /// Override the number of steps that may call the registration algorithm.
    #[arg(long, value_name = "INT")]
    pub max_registration_steps: Option<usize>,

    /// Do not apply chemical-shift range filters to the peak list.
    #[arg(long)]
    pub no_filters: bool,

    // --- Output ---
    /// Directory for the grouping result (created if missing).
    /// Defaults to the directory of the peak list.
    #[arg(long, value_name = "DIR")]
    pub result: Option<PathBuf>,

    /// Print the grouping result document.
    #[arg(long)]
    pub view: bool,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S grouping.max-steps=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the input peak list.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Format of the input peak list.
    #[arg(long = "from", required = true, value_name = "FORMAT")]
    pub from: PeakListFormat,

    /// Path for the converted peak list.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Format of the converted peak list.
    #[arg(long = "to", default_value = "json", value_name = "FORMAT")]
    pub to: PeakListFormat,

    /// Spectrum type of the experiment.
    #[arg(short = 't', long, required = true, value_name = "TYPE")]
    pub spectrum_type: String,

    /// Comma-separated dimension labels, in column order.
    #[arg(short, long, required = true, value_name = "LABELS", value_delimiter = ',')]
    pub dims: Vec<String>,

    /// Do not apply chemical-shift range filters to the peak list.
    #[arg(long)]
    pub no_filters: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a grouping result document.
    #[arg(required = true, value_name = "PATH")]
    pub result: PathBuf,
}
