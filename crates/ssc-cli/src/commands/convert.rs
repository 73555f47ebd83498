use crate::cli::ConvertArgs;
use crate::error::{CliError, Result};
use ssc::core::io::{read_peaklist, write_peaklist};
use ssc::core::models::filter::ShiftRangeFilter;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

pub fn run(args: ConvertArgs) -> Result<()> {
    info!("Loading {} peak list from {:?}", args.from, &args.input);
    let mut peaklist = read_peaklist(&args.input, args.from, &args.spectrum_type, &args.dims)
        .map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;

    if !args.no_filters {
        let before = peaklist.len();
        peaklist = peaklist.filtered(&ShiftRangeFilter::backbone_defaults());
        info!(dropped = before - peaklist.len(), "Applied chemical-shift filters.");
    }

    let mut writer = BufWriter::new(File::create(&args.output)?);
    write_peaklist(&peaklist, args.to, &mut writer)?;
    writer.flush()?;

    println!(
        "✓ Wrote {} peak(s) as {} to: {}",
        peaklist.len(),
        args.to,
        args.output.display()
    );
    Ok(())
}
