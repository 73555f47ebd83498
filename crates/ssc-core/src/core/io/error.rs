use super::format::UnknownFormatError;
use crate::core::models::peak::PeakError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeakListError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    #[error("Invalid peak record #{index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: PeakError,
    },

    #[error("Invalid JSON peak list: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownFormat(#[from] UnknownFormatError),
}

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("Invalid float in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },

    #[error("Expected at least {expected} columns, found {found}")]
    MissingColumns { expected: usize, found: usize },

    #[error("Invalid index '{0}'")]
    InvalidIndex(String),

    #[error(transparent)]
    Peak(#[from] PeakError),
}

pub(crate) fn parse_shift(token: &str, column: usize, line: usize) -> Result<f64, PeakListError> {
    token.parse::<f64>().map_err(|_| PeakListError::Parse {
        line,
        kind: ParseErrorKind::InvalidFloat {
            column,
            value: token.to_string(),
        },
    })
}
