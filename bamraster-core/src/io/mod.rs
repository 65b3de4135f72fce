//! File format adapters for bamraster
//!
//! These turn SAM/BAM and FASTA files into the records, dictionaries and
//! reference sequences the renderer consumes.

#[cfg(feature = "io-sam")] pub mod sam;
#[cfg(feature = "io-fasta")] pub mod fasta;

#[cfg(feature = "io-sam")] pub use sam::{AlignmentReader, SamError};
#[cfg(feature = "io-fasta")] pub use fasta::{FastaError, FastaReference};

use std::path::Path;

/// Alignment container recognised from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFormat {
    Sam,
    Bam,
}

impl AlignmentFormat {
    /// `.bam` is BAM; everything else is read as SAM text.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_lowercase();
        if path_str.ends_with(".bam") {
            AlignmentFormat::Bam
        } else {
            AlignmentFormat::Sam
        }
    }
}
