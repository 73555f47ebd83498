use super::error::{ParseErrorKind, PeakListError, parse_shift};
use super::format::PeakListFormat;
use super::traits::PeakListFile;
use crate::core::models::peak::Peak;
use crate::core::models::peaklist::PeakList;
use std::io::{BufRead, Write};

/// Chemical-shift tables: whitespace separated shift columns, one peak per line,
/// `#` comments. Columns beyond the configured labels become extra attributes.
pub struct CsTableFile;

impl PeakListFile for CsTableFile {
    fn read_from(
        reader: &mut impl BufRead,
        spectrum_type: &str,
        labels: &[String],
    ) -> Result<PeakList, PeakListError> {
        let mut peaklist = PeakList::new(spectrum_type, labels.to_vec(), PeakListFormat::CsTable);

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let values = trimmed
                .split_whitespace()
                .enumerate()
                .map(|(idx, token)| parse_shift(token, idx + 1, line_num))
                .collect::<Result<Vec<_>, _>>()?;
            if values.len() < labels.len() {
                return Err(PeakListError::Parse {
                    line: line_num,
                    kind: ParseErrorKind::MissingColumns {
                        expected: labels.len(),
                        found: values.len(),
                    },
                });
            }

            let (shifts, extra) = values.split_at(labels.len());
            let peak = Peak::unassigned(labels, shifts, extra.to_vec()).map_err(|e| {
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
        writeln!(writer, "# {}", peaklist.labels().join("\t"))?;
        for peak in peaklist.peaks() {
            let values: Vec<String> = peak
                .shifts()
                .iter()
                .chain(peak.extra())
                .map(|v| v.to_string())
                .collect();
            writeln!(writer, "{}", values.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn labels() -> Vec<String> {
        vec!["HN".to_string(), "N".to_string()]
    }

    #[test]
    fn read_parses_columns_and_skips_comments() {
        let content = "# HN N\n8.21 119.70\n\n7.95 121.04 0.8\n";
        let list = CsTableFile::read_from(&mut Cursor::new(content), "HSQC", &labels()).unwrap();

        assert_eq!(list.len(), 2);
        let second = list.peaks().nth(1).unwrap();
        assert_eq!(second.shifts(), vec![7.95, 121.04]);
        assert_eq!(second.extra(), &[0.8]);
        assert_eq!(second.assignments(), vec!["?", "?"]);
    }

    #[test]
    fn read_rejects_short_rows() {
        let err = CsTableFile::read_from(&mut Cursor::new("8.21\n"), "HSQC", &labels())
            .unwrap_err();
        assert!(matches!(
            err,
            PeakListError::Parse {
                line: 1,
                kind: ParseErrorKind::MissingColumns { .. }
            }
        ));
    }

    #[test]
    fn written_table_reads_back() {
        let list =
            CsTableFile::read_from(&mut Cursor::new("8.21 119.7\n"), "HSQC", &labels()).unwrap();
        let mut buffer = Vec::new();
        CsTableFile::write_to(&list, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "# HN\tN\n8.21\t119.7\n");

        let reread = CsTableFile::read_from(&mut Cursor::new(buffer), "HSQC", &labels()).unwrap();
        assert_eq!(reread.peaks().next().unwrap().shifts(), vec![8.21, 119.7]);
    }
}
