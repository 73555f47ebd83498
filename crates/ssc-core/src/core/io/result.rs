use crate::core::models::tolerance::ToleranceMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

const DOCUMENT_INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum ResultDocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed grouping result document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One member peak of a cluster as stored in the result document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    pub dimensions: Vec<f64>,
    pub assignment: Vec<String>,
    /// Position of the peak within its cluster.
    pub index: usize,
}

/// One cluster (or the noise bucket, label `-1`) as stored in the result document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub label: i64,
    pub peaks: Vec<PeakRecord>,
    pub stds: ToleranceMap,
}

/// The persisted outcome of one grouping run: a JSON array with one object per
/// cluster, the noise cluster included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultDocument {
    pub clusters: Vec<ClusterRecord>,
}

impl ResultDocument {
    pub fn new(clusters: Vec<ClusterRecord>) -> Self {
        Self { clusters }
    }

    pub fn cluster(&self, label: i64) -> Option<&ClusterRecord> {
        self.clusters.iter().find(|c| c.label == label)
    }

    pub fn to_json_string(&self) -> Result<String, ResultDocumentError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| ResultDocumentError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), ResultDocumentError> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(DOCUMENT_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ResultDocumentError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_from(reader: impl Read) -> Result<Self, ResultDocumentError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ResultDocumentError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}
