//! CIGAR operators and spans in their SAM text form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CigarError {
    #[error("CIGAR operator '{0}' has no length")]
    MissingLength(char),
    #[error("CIGAR string ends with a dangling length: {0}")]
    DanglingLength(String),
    #[error("CIGAR length out of range in '{0}'")]
    LengthOverflow(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CigarOp {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Pad,
    SequenceMatch,
    SequenceMismatch,
    /// Operator letter outside the SAM alphabet.
    Other(char),
}

impl CigarOp {
    pub fn from_char(c: char) -> Self {
        match c {
            'M' => CigarOp::Match,
            'I' => CigarOp::Insertion,
            'D' => CigarOp::Deletion,
            'N' => CigarOp::Skip,
            'S' => CigarOp::SoftClip,
            'H' => CigarOp::HardClip,
            'P' => CigarOp::Pad,
            '=' => CigarOp::SequenceMatch,
            'X' => CigarOp::SequenceMismatch,
            other => CigarOp::Other(other),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Insertion => 'I',
            CigarOp::Deletion => 'D',
            CigarOp::Skip => 'N',
            CigarOp::SoftClip => 'S',
            CigarOp::HardClip => 'H',
            CigarOp::Pad => 'P',
            CigarOp::SequenceMatch => '=',
            CigarOp::SequenceMismatch => 'X',
            CigarOp::Other(c) => c,
        }
    }

    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            CigarOp::Match
                | CigarOp::Deletion
                | CigarOp::Skip
                | CigarOp::SequenceMatch
                | CigarOp::SequenceMismatch
        )
    }

    pub fn is_clip(self) -> bool {
        matches!(self, CigarOp::SoftClip | CigarOp::HardClip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CigarSpan {
    pub op: CigarOp,
    pub len: u32,
}

impl CigarSpan {
    pub fn new(op: CigarOp, len: u32) -> Self {
        Self { op, len }
    }
}

/// Ordered list of spans. Empty for an unavailable CIGAR (`*`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cigar(Vec<CigarSpan>);

impl Cigar {
    pub fn new(spans: Vec<CigarSpan>) -> Self {
        Self(spans)
    }

    pub fn spans(&self) -> &[CigarSpan] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CigarSpan> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn reference_len(&self) -> u64 {
        self.0
            .iter()
            .filter(|span| span.op.consumes_reference())
            .map(|span| span.len as u64)
            .sum()
    }
}

impl From<Vec<CigarSpan>> for Cigar {
    fn from(spans: Vec<CigarSpan>) -> Self {
        Self(spans)
    }
}

impl<'a> IntoIterator for &'a Cigar {
    type Item = &'a CigarSpan;
    type IntoIter = std::slice::Iter<'a, CigarSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for Cigar {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(Cigar::default());
        }

        let mut spans = Vec::new();
        let mut len: Option<u32> = None;
        for c in s.chars() {
            if let Some(digit) = c.to_digit(10) {
                let next = len
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or_else(|| CigarError::LengthOverflow(s.to_string()))?;
                len = Some(next);
            } else {
                let n = len.take().ok_or(CigarError::MissingLength(c))?;
                spans.push(CigarSpan::new(CigarOp::from_char(c), n));
            }
        }
        if len.is_some() {
            return Err(CigarError::DanglingLength(s.to_string()));
        }
        Ok(Cigar(spans))
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "*");
        }
        for span in &self.0 {
            write!(f, "{}{}", span.len, span.op.as_char())?;
        }
        Ok(())
    }
}
