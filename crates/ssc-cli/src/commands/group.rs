use crate::cli::GroupArgs;
use crate::config::defaults::RESULT_FILE_SUFFIX;
use crate::config::{GroupSettings, PartialGroupConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use ssc::{
    core::io::{read_peaklist, result::ResultDocument},
    engine::{oracle::ProcessOracle, progress::ProgressReporter, registry::ClusterRegistry},
    workflows::{self, group::GroupingOutcome},
};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: GroupArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialGroupConfig::from_file(path)?,
        None => PartialGroupConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Grouping peaks of {}...", settings.peaklist_path.display());
    let grouped = group_peaklist(&settings, &reporter);
    progress_handler.finish();
    let (outcome, document) = grouped?;
    let output_path = result_path(&settings.peaklist_path, settings.result_dir.as_deref())?;
    write_document(&document, &output_path)?;

    println!(
        "✓ {} spin system(s) after {} pass(es) ({:?}); {} peak(s) left unclustered.",
        document.clusters.iter().filter(|c| c.label >= 0).count(),
        outcome.passes,
        outcome.stop,
        outcome.unclustered.len()
    );
    println!("  Grouping result written to: {}", output_path.display());

    if settings.view {
        println!("{}", document.to_json_string()?);
    }
    Ok(())
}

/// Reads the peak list and runs the grouping workflow against the
/// registration executable named in `settings`.
pub fn group_peaklist(
    settings: &GroupSettings,
    reporter: &ProgressReporter,
) -> Result<(GroupingOutcome, ResultDocument)> {
    info!("Loading peak list from {:?}", &settings.peaklist_path);
    let peaklist = read_peaklist(
        &settings.peaklist_path,
        settings.format,
        &settings.spectrum_type,
        &settings.labels,
    )
    .map_err(|e| CliError::FileParsing {
        path: settings.peaklist_path.clone(),
        source: e.into(),
    })?;
    info!(peaks = peaklist.len(), "Peak list loaded.");

    let oracle = ProcessOracle::new(&settings.executable).with_timeout(settings.timeout);
    let mut registry = ClusterRegistry::new(peaklist.source().unwrap_or_default());

    info!("Invoking the core grouping workflow...");
    let outcome = workflows::group::run(
        &peaklist,
        &settings.grouping,
        &oracle,
        &mut registry,
        reporter,
    )?;
    Ok((outcome, registry.to_document()))
}

/// `<peak list file name>_grouping_result.json`, next to the peak list or in `result_dir`.
pub fn result_path(peaklist_path: &Path, result_dir: Option<&Path>) -> Result<PathBuf> {
    let file_name = peaklist_path.file_name().ok_or_else(|| {
        CliError::Argument(format!(
            "Peak list path has no file name: {}",
            peaklist_path.display()
        ))
    })?;
    let mut result_name = file_name.to_os_string();
    result_name.push(RESULT_FILE_SUFFIX);

    let directory = match result_dir {
        Some(dir) => dir.to_path_buf(),
        None => peaklist_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    Ok(directory.join(result_name))
}

fn write_document(document: &ResultDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            info!("Creating result directory {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    document.write_to_path(path)?;
    Ok(())
}
