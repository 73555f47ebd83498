use super::error::PeakListError;
use super::format::PeakListFormat;
use super::traits::PeakListFile;
use crate::core::models::peak::Peak;
use crate::core::models::peaklist::PeakList;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct JsonPeakRecord {
    #[serde(rename = "Assignment")]
    assignment: Vec<String>,
    #[serde(rename = "Dimensions")]
    dimensions: Vec<f64>,
    #[serde(rename = "DataHeight", default)]
    data_height: Vec<f64>,
}

/// JSON peak lists: an array of `{Assignment, Dimensions, DataHeight}` records.
///
/// `Dimensions` values beyond the configured labels are treated as extra
/// attributes, followed by the `DataHeight` values.
pub struct JsonPeakListFile;

impl JsonPeakListFile {
    /// Serializes a peak list to a compact JSON string.
    pub fn to_json_string(peaklist: &PeakList) -> Result<String, PeakListError> {
        let records = Self::records(peaklist);
        Ok(serde_json::to_string(&records)?)
    }

    fn records(peaklist: &PeakList) -> Vec<JsonPeakRecord> {
        peaklist
            .peaks()
            .map(|peak| JsonPeakRecord {
                assignment: peak.assignments(),
                dimensions: peak.shifts(),
                data_height: peak.extra().to_vec(),
            })
            .collect()
    }
}

impl PeakListFile for JsonPeakListFile {
    fn read_from(
        reader: &mut impl BufRead,
        spectrum_type: &str,
        labels: &[String],
    ) -> Result<PeakList, PeakListError> {
        let records: Vec<JsonPeakRecord> = serde_json::from_reader(reader)?;
        let mut peaklist = PeakList::new(spectrum_type, labels.to_vec(), PeakListFormat::Json);

        for (index, record) in records.into_iter().enumerate() {
            let split = record.dimensions.len().min(labels.len());
            let (shifts, surplus) = record.dimensions.split_at(split);
            let extra: Vec<f64> = surplus
                .iter()
                .copied()
                .chain(record.data_height.iter().copied())
                .collect();

            let peak = Peak::new(labels, &record.assignment, shifts, extra)
                .map_err(|source| PeakListError::Record { index, source })?;
            peaklist
                .push(peak)
                .map_err(|source| PeakListError::Record { index, source })?;
        }

        Ok(peaklist)
    }

    fn write_to(peaklist: &PeakList, writer: &mut impl Write) -> Result<(), PeakListError> {
        let records = Self::records(peaklist);
        serde_json::to_writer_pretty(&mut *writer, &records)?;
        writeln!(writer)?;
        Ok(())
    }
}
