//! Record filter predicates applied before packing.

use serde::{Deserialize, Serialize};

use crate::types::{AlignmentRecord, Flags};

/// Decides whether a record takes part in the pileup.
pub trait RecordFilter {
    fn accept(&self, record: &AlignmentRecord) -> bool;
}

impl<F> RecordFilter for F
where
    F: Fn(&AlignmentRecord) -> bool,
{
    fn accept(&self, record: &AlignmentRecord) -> bool {
        self(record)
    }
}

/// Mapping-quality and flag filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFilter {
    #[serde(default = "default_min_mapping_quality")]
    pub min_mapping_quality: u8,
    /// Records with any of these flag bits set are rejected.
    #[serde(default = "default_excluded_flags")]
    pub excluded_flags: u16,
}

fn default_min_mapping_quality() -> u8 {
    1
}

fn default_excluded_flags() -> u16 {
    Flags::DUPLICATE | Flags::QC_FAIL | Flags::SECONDARY | Flags::SUPPLEMENTARY
}

impl Default for ReadFilter {
    fn default() -> Self {
        Self {
            min_mapping_quality: default_min_mapping_quality(),
            excluded_flags: default_excluded_flags(),
        }
    }
}

impl ReadFilter {
    pub fn accept_all() -> Self {
        Self {
            min_mapping_quality: 0,
            excluded_flags: 0,
        }
    }
}

impl RecordFilter for ReadFilter {
    fn accept(&self, record: &AlignmentRecord) -> bool {
        record.mapping_quality >= self.min_mapping_quality
            && !record.flags.intersects(self.excluded_flags)
    }
}
