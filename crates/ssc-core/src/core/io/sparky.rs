use super::error::{ParseErrorKind, PeakListError, parse_shift};
use super::format::PeakListFormat;
use super::traits::PeakListFile;
use crate::core::models::peak::Peak;
use crate::core::models::peaklist::PeakList;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};

static ASSIGNMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w?]+(-[\w?]+)+").expect("valid assignment pattern"));

/// Sparky peak lists: a header line, then one line per peak with a dash-joined
/// assignment followed by one chemical shift per dimension and, optionally,
/// extra numeric columns such as the data height.
///
/// ```text
/// Assignment    w1       w2
/// G16H-G16N     8.210    119.700
/// ?-?           7.950    121.040
/// ```
pub struct SparkyFile;

impl PeakListFile for SparkyFile {
    fn read_from(
        reader: &mut impl BufRead,
        spectrum_type: &str,
        labels: &[String],
    ) -> Result<PeakList, PeakListError> {
        let mut peaklist = PeakList::new(spectrum_type, labels.to_vec(), PeakListFormat::Sparky);

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let mut tokens = line.split_whitespace();
            let Some(assignment) = tokens.next() else {
                continue;
            };
            if !ASSIGNMENT_PATTERN.is_match(assignment) {
                continue;
            }

            let assignments: Vec<&str> = assignment.split('-').collect();
            let values: Vec<&str> = tokens.collect();
            if values.len() < labels.len() {
                return Err(PeakListError::Parse {
                    line: line_num,
                    kind: ParseErrorKind::MissingColumns {
                        expected: labels.len() + 1,
                        found: values.len() + 1,
                    },
                });
            }

            let shifts = values[..labels.len()]
                .iter()
                .enumerate()
                .map(|(idx, token)| parse_shift(token, idx + 2, line_num))
                .collect::<Result<Vec<_>, _>>()?;
            let extra: Vec<f64> = values[labels.len()..]
                .iter()
                .filter_map(|token| token.parse().ok())
                .collect();

            let peak = Peak::new(labels, &assignments, &shifts, extra).map_err(|e| {
                PeakListError::Parse {
                    line: line_num,
                    kind: e.into(),
                }
            })?;
            peaklist.push(peak).map_err(|e| PeakListError::Parse {
                line: line_num,
                kind: e.into(),
            })?;
        }

        Ok(peaklist)
    }

    fn write_to(peaklist: &PeakList, writer: &mut impl Write) -> Result<(), PeakListError> {
        let columns: Vec<String> = (1..=peaklist.labels().len())
            .map(|i| format!("w{}", i))
            .collect();
        writeln!(writer, "Assignment\t{}", columns.join("\t"))?;

        for peak in peaklist.peaks() {
            let values: Vec<String> = peak
                .shifts()
                .iter()
                .chain(peak.extra())
                .map(|v| v.to_string())
                .collect();
            writeln!(
                writer,
                "{}\t{}",
                peak.assignments().join("-"),
                values.join("\t")
            )?;
        }
        Ok(())
    }
}
