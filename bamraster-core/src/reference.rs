//! Reference bases for the rendered window.

/// Either the bases of one contig or a stand-in that answers `N` everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReferenceSequence {
    Fasta { contig: String, bases: Vec<u8> },
    #[default]
    Synthetic,
}

impl ReferenceSequence {
    pub fn fasta(contig: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        ReferenceSequence::Fasta {
            contig: contig.into(),
            bases: bases.into(),
        }
    }

    /// Base at a 1-based position; `N` outside the known sequence.
    pub fn base_at(&self, pos: i64) -> u8 {
        match self {
            ReferenceSequence::Fasta { bases, .. } if pos >= 1 => {
                bases.get((pos - 1) as usize).copied().unwrap_or(b'N')
            }
            _ => b'N',
        }
    }
}
