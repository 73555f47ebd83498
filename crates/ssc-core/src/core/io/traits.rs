use super::error::PeakListError;
use crate::core::models::peaklist::PeakList;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing one peak-list file format.
///
/// Readers receive the spectrum type and dimension labels from the caller, as
/// none of the supported formats records them reliably.
pub trait PeakListFile {
    /// Reads a peak list from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be parsed or a peak does not fit the
    /// requested labels.
    fn read_from(
        reader: &mut impl BufRead,
        spectrum_type: &str,
        labels: &[String],
    ) -> Result<PeakList, PeakListError>;

    /// Writes a peak list to a writer.
    fn write_to(peaklist: &PeakList, writer: &mut impl Write) -> Result<(), PeakListError>;

    /// Reads a peak list from a file path. The path becomes the list's source.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
        spectrum_type: &str,
        labels: &[String],
    ) -> Result<PeakList, PeakListError> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let peaklist = Self::read_from(&mut reader, spectrum_type, labels)?;
        Ok(peaklist.with_source(path.as_ref().to_string_lossy()))
    }

    /// Writes a peak list to a file path.
    fn write_to_path<P: AsRef<Path>>(peaklist: &PeakList, path: P) -> Result<(), PeakListError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(peaklist, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
