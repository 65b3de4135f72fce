use serde::{Deserialize, Serialize};

use crate::cigar::Cigar;

/// 1-based genomic coordinate. Signed so unclipped starts before position 1
/// stay representable.
pub type GenomicPos = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl From<bool> for Strand {
    fn from(forward: bool) -> Self {
        if forward {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

/// SAM flag word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Flags(pub u16);

impl Flags {
    pub const PAIRED: u16 = 0x1;
    pub const PROPER_PAIR: u16 = 0x2;
    pub const UNMAPPED: u16 = 0x4;
    pub const MATE_UNMAPPED: u16 = 0x8;
    pub const REVERSE: u16 = 0x10;
    pub const MATE_REVERSE: u16 = 0x20;
    pub const FIRST_OF_PAIR: u16 = 0x40;
    pub const SECOND_OF_PAIR: u16 = 0x80;
    pub const SECONDARY: u16 = 0x100;
    pub const QC_FAIL: u16 = 0x200;
    pub const DUPLICATE: u16 = 0x400;
    pub const SUPPLEMENTARY: u16 = 0x800;

    pub fn contains(self, mask: u16) -> bool {
        self.0 & mask == mask
    }

    pub fn intersects(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    pub fn is_paired(self) -> bool {
        self.contains(Self::PAIRED)
    }

    pub fn is_proper_pair(self) -> bool {
        self.contains(Self::PROPER_PAIR)
    }

    pub fn is_unmapped(self) -> bool {
        self.contains(Self::UNMAPPED)
    }

    pub fn is_mate_unmapped(self) -> bool {
        self.contains(Self::MATE_UNMAPPED)
    }

    pub fn is_reverse(self) -> bool {
        self.contains(Self::REVERSE)
    }

    pub fn is_duplicate(self) -> bool {
        self.contains(Self::DUPLICATE)
    }
}

impl From<u16> for Flags {
    fn from(bits: u16) -> Self {
        Flags(bits)
    }
}

/// One aligned read as seen by the renderer. Read-only for the duration of a
/// render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub name: String,
    pub contig: String,
    /// 1-based leftmost aligned reference position.
    pub alignment_start: GenomicPos,
    pub cigar: Cigar,
    /// Read bases as stored; empty when the sequence is unavailable (`*`).
    pub sequence: Vec<u8>,
    pub flags: Flags,
    pub mapping_quality: u8,
}

impl AlignmentRecord {
    pub fn new(
        name: impl Into<String>,
        contig: impl Into<String>,
        alignment_start: GenomicPos,
        cigar: Cigar,
        sequence: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            contig: contig.into(),
            alignment_start,
            cigar,
            sequence: sequence.into(),
            flags: Flags::default(),
            mapping_quality: 60,
        }
    }

    /// Builder method to attach SAM flags
    pub fn with_flags(mut self, flags: impl Into<Flags>) -> Self {
        self.flags = flags.into();
        self
    }

    /// Builder method to attach a mapping quality
    pub fn with_mapping_quality(mut self, mapq: u8) -> Self {
        self.mapping_quality = mapq;
        self
    }

    pub fn strand(&self) -> Strand {
        Strand::from(!self.flags.is_reverse())
    }

    /// 1-based inclusive end of the aligned part. A CIGAR that consumes no
    /// reference yields `alignment_start - 1`.
    pub fn alignment_end(&self) -> GenomicPos {
        self.alignment_start + self.cigar.reference_len() as GenomicPos - 1
    }

    pub fn unclipped_start(&self) -> GenomicPos {
        let clipped: u64 = self
            .cigar
            .iter()
            .take_while(|span| span.op.is_clip())
            .map(|span| span.len as u64)
            .sum();
        self.alignment_start - clipped as GenomicPos
    }

    pub fn unclipped_end(&self) -> GenomicPos {
        let clipped: u64 = self
            .cigar
            .iter()
            .rev()
            .take_while(|span| span.op.is_clip())
            .map(|span| span.len as u64)
            .sum();
        self.alignment_end() + clipped as GenomicPos
    }

    /// Left edge used for layout: unclipped when clips are displayed.
    pub fn start(&self, show_clipping: bool) -> GenomicPos {
        if show_clipping {
            self.unclipped_start()
        } else {
            self.alignment_start
        }
    }

    /// Right edge used for layout: unclipped when clips are displayed.
    pub fn end(&self, show_clipping: bool) -> GenomicPos {
        if show_clipping {
            self.unclipped_end()
        } else {
            self.alignment_end()
        }
    }

    /// Read base at a 0-based read offset, `N` when the sequence is missing
    /// or the offset is out of range.
    pub fn base_at(&self, read_pos: usize) -> u8 {
        self.sequence.get(read_pos).copied().unwrap_or(b'N')
    }

    /// Read name character at a 0-based read offset, cased by strand.
    /// Offsets past the name give a space.
    pub fn name_char_at(&self, read_pos: usize) -> u8 {
        match self.name.as_bytes().get(read_pos) {
            Some(c) if self.flags.is_reverse() => c.to_ascii_lowercase(),
            Some(c) => c.to_ascii_uppercase(),
            None => b' ',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: GenomicPos, cigar: &str) -> AlignmentRecord {
        AlignmentRecord::new("read1", "chr1", start, cigar.parse().unwrap(), b"ACGTACGTAC".to_vec())
    }

    #[test]
    fn test_alignment_end_counts_reference_ops() {
        let rec = record(100, "4M2D4M");
        assert_eq!(rec.alignment_end(), 109);

        let rec = record(100, "3M3I4M");
        assert_eq!(rec.alignment_end(), 106);
    }

    #[test]
    fn test_unclipped_bounds() {
        let rec = record(100, "2H3S5M4S");
        assert_eq!(rec.unclipped_start(), 95);
        assert_eq!(rec.alignment_end(), 104);
        assert_eq!(rec.unclipped_end(), 108);
        assert_eq!(rec.start(false), 100);
        assert_eq!(rec.start(true), 95);
        assert_eq!(rec.end(false), 104);
        assert_eq!(rec.end(true), 108);
    }

    #[test]
    fn test_base_at_out_of_range() {
        let rec = record(1, "10M");
        assert_eq!(rec.base_at(0), b'A');
        assert_eq!(rec.base_at(10), b'N');

        let empty = AlignmentRecord::new("r", "chr1", 1, "5M".parse().unwrap(), Vec::new());
        assert_eq!(empty.base_at(0), b'N');
    }

    #[test]
    fn test_name_char_cased_by_strand() {
        let fwd = AlignmentRecord::new("ReadX", "chr1", 1, "5M".parse().unwrap(), Vec::new());
        assert_eq!(fwd.name_char_at(1), b'E');
        assert_eq!(fwd.name_char_at(9), b' ');

        let rev = fwd.clone().with_flags(Flags::REVERSE);
        assert_eq!(rev.name_char_at(0), b'r');
        assert_eq!(rev.strand(), Strand::Reverse);
    }

    #[test]
    fn test_flag_predicates() {
        let flags = Flags(Flags::PAIRED | Flags::MATE_UNMAPPED | Flags::DUPLICATE);
        assert!(flags.is_paired());
        assert!(!flags.is_proper_pair());
        assert!(flags.is_mate_unmapped());
        assert!(flags.is_duplicate());
        assert!(!flags.is_unmapped());
        assert!(flags.intersects(Flags::DUPLICATE | Flags::SECONDARY));
    }
}
