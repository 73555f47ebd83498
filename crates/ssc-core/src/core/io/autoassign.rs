use super::error::{ParseErrorKind, PeakListError, parse_shift};
use super::format::PeakListFormat;
use super::traits::PeakListFile;
use crate::core::models::peak::Peak;
use crate::core::models::peaklist::PeakList;
use std::io::{BufRead, Write};

const COMMENT_PREFIX: char = '#';
const TERMINATOR_PREFIX: char = '*';
const HEADER_TOKEN: &str = "index";

/// AutoAssign peak lists: `Index  1Dim .. nDim  Intensity  Workbook`.
///
/// Lines starting with `#` are comments and a line starting with `*` ends the
/// list. Peaks are always unassigned; the intensity is kept as the peak's only
/// extra attribute and the workbook column is ignored on input.
pub struct AutoAssignFile;

impl PeakListFile for AutoAssignFile {
    fn read_from(
        reader: &mut impl BufRead,
        spectrum_type: &str,
        labels: &[String],
    ) -> Result<PeakList, PeakListError> {
        let mut peaklist =
            PeakList::new(spectrum_type, labels.to_vec(), PeakListFormat::AutoAssign);
        let expected_columns = labels.len() + 3;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
                continue;
            }
            if trimmed.starts_with(TERMINATOR_PREFIX) {
                break;
            }

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if tokens[0].eq_ignore_ascii_case(HEADER_TOKEN) {
                continue;
            }
            if tokens.len() != expected_columns {
                return Err(PeakListError::Parse {
                    line: line_num,
                    kind: ParseErrorKind::MissingColumns {
                        expected: expected_columns,
                        found: tokens.len(),
                    },
                });
            }

            tokens[0]
                .parse::<usize>()
                .map_err(|_| PeakListError::Parse {
                    line: line_num,
                    kind: ParseErrorKind::InvalidIndex(tokens[0].to_string()),
                })?;

            let shifts = tokens[1..=labels.len()]
                .iter()
                .enumerate()
                .map(|(idx, token)| parse_shift(token, idx + 2, line_num))
                .collect::<Result<Vec<_>, _>>()?;
            let intensity_column = labels.len() + 1;
            let intensity = parse_shift(tokens[intensity_column], intensity_column + 1, line_num)?;

            let peak = Peak::unassigned(labels, &shifts, vec![intensity]).map_err(|e| {
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
            .map(|i| format!("{}Dim", i))
            .collect();
        writeln!(writer, "Index\t{}\tIntensity\tWorkbook", columns.join("\t"))?;

        for (index, peak) in peaklist.peaks().enumerate() {
            let shifts: Vec<String> = peak.shifts().iter().map(|v| v.to_string()).collect();
            let intensity = peak.extra().first().copied().unwrap_or(0.0);
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                index + 1,
                shifts.join("\t"),
                intensity,
                peaklist.spectrum_type()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn labels() -> Vec<String> {
        vec!["HN".to_string(), "N".to_string(), "CO".to_string()]
    }

    #[test]
    fn read_skips_comments_and_stops_at_terminator() {
        let content = "\
# AutoAssign peak list
1  8.21  119.70  176.2  15000  HNCO
2  7.95  121.04  175.1  12000  HNCO
*
3  7.00  110.00  170.0  100    HNCO
";
        let list =
            AutoAssignFile::read_from(&mut Cursor::new(content), "HNCO", &labels()).unwrap();

        assert_eq!(list.len(), 2);
        let first = list.peaks().next().unwrap();
        assert_eq!(first.shifts(), vec![8.21, 119.7, 176.2]);
        assert_eq!(first.assignments(), vec!["?", "?", "?"]);
        assert_eq!(first.extra(), &[15000.0]);
    }

    #[test]
    fn read_rejects_rows_with_wrong_column_count() {
        let content = "1 8.21 119.70 15000 HNCO\n";
        let err =
            AutoAssignFile::read_from(&mut Cursor::new(content), "HNCO", &labels()).unwrap_err();
        assert!(matches!(
            err,
            PeakListError::Parse {
                line: 1,
                kind: ParseErrorKind::MissingColumns {
                    expected: 6,
                    found: 5
                }
            }
        ));
    }

    #[test]
    fn read_rejects_non_numeric_index() {
        let content = "A1 8.21 119.70 176.2 15000 HNCO\n";
        let err =
            AutoAssignFile::read_from(&mut Cursor::new(content), "HNCO", &labels()).unwrap_err();
        assert!(matches!(
            err,
            PeakListError::Parse {
                kind: ParseErrorKind::InvalidIndex(_),
                ..
            }
        ));
    }

    #[test]
    fn written_list_can_be_read_back() {
        let content = "1 8.21 119.70 176.2 15000 HNCO\n2 7.95 121.04 175.1 0 HNCO\n";
        let list =
            AutoAssignFile::read_from(&mut Cursor::new(content), "HNCO", &labels()).unwrap();

        let mut buffer = Vec::new();
        AutoAssignFile::write_to(&list, &mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("Index\t1Dim\t2Dim\t3Dim\tIntensity\tWorkbook\n"));
        assert!(text.contains("1\t8.21\t119.7\t176.2\t15000\tHNCO"));

        let reread =
            AutoAssignFile::read_from(&mut Cursor::new(buffer), "HNCO", &labels()).unwrap();
        assert_eq!(reread.len(), 2);
        assert_eq!(
            reread.peaks().nth(1).unwrap().shifts(),
            vec![7.95, 121.04, 175.1]
        );
    }
}
