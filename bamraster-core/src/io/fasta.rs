//! FASTA reference loader
//!
//! Reads one contig out of a FASTA (optionally gzipped; needletail detects
//! compression) into a [`ReferenceSequence`]. Contigs are matched on the first
//! whitespace-separated word of the header line.

use std::path::{Path, PathBuf};

use log::{debug, info};
use needletail::parse_fastx_file;
use thiserror::Error;

use crate::reference::ReferenceSequence;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("Cannot read FASTA '{path}': {message}")]
    Open { path: PathBuf, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Contig '{contig}' not found in {path}")]
    MissingContig { contig: String, path: PathBuf },
}

/// FASTA file used as the reference track.
#[derive(Debug, Clone)]
pub struct FastaReference {
    path: PathBuf,
}

impl FastaReference {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the bases of `contig`. A missing contig is an error.
    pub fn load_contig(&self, contig: &str) -> Result<ReferenceSequence, FastaError> {
        let mut reader = parse_fastx_file(&self.path).map_err(|e| FastaError::Open {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        while let Some(record) = reader.next() {
            let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
            let id = contig_name(record.id());
            if id == contig {
                let bases = record.seq().to_vec();
                info!("Loaded {} bp of {} from {}", bases.len(), contig, self.path.display());
                return Ok(ReferenceSequence::fasta(contig, bases));
            }
            debug!("Skipping FASTA record {}", id);
        }

        Err(FastaError::MissingContig {
            contig: contig.to_string(),
            path: self.path.clone(),
        })
    }
}

fn contig_name(id: &[u8]) -> String {
    let id = String::from_utf8_lossy(id);
    id.split_whitespace().next().unwrap_or_default().to_string()
}
