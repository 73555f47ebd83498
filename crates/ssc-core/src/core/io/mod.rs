//! Reading and writing peak lists and grouping result documents.
//!
//! Each supported peak-list format implements [`traits::PeakListFile`];
//! [`read_peaklist`] and [`write_peaklist`] dispatch on a [`format::PeakListFormat`].
//! [`result`] holds the JSON document produced by a grouping run.

pub mod autoassign;
pub mod cstable;
pub mod error;
pub mod format;
pub mod json;
pub mod result;
pub mod sparky;
pub mod traits;

use crate::core::models::peaklist::PeakList;
use autoassign::AutoAssignFile;
use cstable::CsTableFile;
use error::PeakListError;
use format::PeakListFormat;
use json::JsonPeakListFile;
use sparky::SparkyFile;
use std::io::Write;
use std::path::Path;
use traits::PeakListFile;

/// Reads a peak list in the given format from `path`.
pub fn read_peaklist<P: AsRef<Path>>(
    path: P,
    format: PeakListFormat,
    spectrum_type: &str,
    labels: &[String],
) -> Result<PeakList, PeakListError> {
    match format {
        PeakListFormat::Sparky => SparkyFile::read_from_path(path, spectrum_type, labels),
        PeakListFormat::AutoAssign => AutoAssignFile::read_from_path(path, spectrum_type, labels),
        PeakListFormat::Json => JsonPeakListFile::read_from_path(path, spectrum_type, labels),
        PeakListFormat::CsTable => CsTableFile::read_from_path(path, spectrum_type, labels),
    }
}

/// Writes a peak list in the given format.
pub fn write_peaklist(
    peaklist: &PeakList,
    format: PeakListFormat,
    writer: &mut impl Write,
) -> Result<(), PeakListError> {
    match format {
        PeakListFormat::Sparky => SparkyFile::write_to(peaklist, writer),
        PeakListFormat::AutoAssign => AutoAssignFile::write_to(peaklist, writer),
        PeakListFormat::Json => JsonPeakListFile::write_to(peaklist, writer),
        PeakListFormat::CsTable => CsTableFile::write_to(peaklist, writer),
    }
}
