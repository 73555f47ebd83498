use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Textual peak-list formats understood by the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeakListFormat {
    /// Sparky: assignment (`A-B-C`) followed by one shift column per dimension.
    Sparky,
    /// AutoAssign: index, shifts, intensity and workbook columns.
    AutoAssign,
    /// JSON array of `{Assignment, Dimensions, DataHeight}` records.
    #[default]
    Json,
    /// Bare columns of chemical shifts.
    CsTable,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown peak list format: '{0}'. Expected one of: sparky, autoassign, json, cstable.")]
pub struct UnknownFormatError(pub String);

impl PeakListFormat {
    pub fn name(&self) -> &'static str {
        match self {
            PeakListFormat::Sparky => "sparky",
            PeakListFormat::AutoAssign => "autoassign",
            PeakListFormat::Json => "json",
            PeakListFormat::CsTable => "cstable",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PeakListFormat::Sparky => "txt",
            PeakListFormat::AutoAssign => "pks",
            PeakListFormat::Json => "json",
            PeakListFormat::CsTable => "txt",
        }
    }
}

impl fmt::Display for PeakListFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PeakListFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sparky" => Ok(PeakListFormat::Sparky),
            "autoassign" | "auto-assign" => Ok(PeakListFormat::AutoAssign),
            "json" => Ok(PeakListFormat::Json),
            "cstable" | "cs-table" => Ok(PeakListFormat::CsTable),
            _ => Err(UnknownFormatError(s.to_string())),
        }
    }
}
