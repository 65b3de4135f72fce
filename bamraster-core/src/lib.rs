//! bamraster Core Library
//!
//! Alignment records, CIGAR spans, regions, record filters and the reference
//! sequence capability consumed by the renderer, plus SAM/BAM and FASTA
//! adapters that produce them.

pub mod types;
pub mod cigar;
pub mod region;
pub mod filter;
pub mod reference;
pub mod io;

// Re-export commonly used types and functions
pub use types::{AlignmentRecord, Flags, GenomicPos, Strand};
pub use cigar::{Cigar, CigarError, CigarOp, CigarSpan};
pub use region::{Region, RegionError, SequenceDictionary};
pub use filter::{ReadFilter, RecordFilter};
pub use reference::ReferenceSequence;

/// Version information for the bamraster core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
