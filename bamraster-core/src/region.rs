//! Genomic regions and their textual forms.
//!
//! Accepted forms, thousands separators allowed in every number:
//! `chr`, `chr:pos`, `chr:start-end` and `chr:pos+flank`.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::GenomicPos;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("invalid region format: expected 'chr:start-end', 'chr:pos', 'chr:pos+flank' or 'chr', got '{0}'")]
    InvalidFormat(String),
    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("region start ({start}) must not be greater than end ({end})")]
    InvalidRange { start: GenomicPos, end: GenomicPos },
    #[error("region start must be >= 1, got {0}")]
    StartBeforeOne(GenomicPos),
    #[error("contig '{0}' is not in the sequence dictionary")]
    UnknownContig(String),
    #[error("a whole-contig region '{0}' needs a sequence dictionary")]
    NeedsDictionary(String),
}

/// Contig names and lengths, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDictionary {
    contigs: Vec<(String, u64)>,
}

impl SequenceDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, length: u64) {
        self.contigs.push((name.into(), length));
    }

    pub fn length_of(&self, name: &str) -> Option<u64> {
        self.contigs
            .iter()
            .find(|(contig, _)| contig == name)
            .map(|(_, len)| *len)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.length_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.contigs.iter().map(|(name, len)| (name.as_str(), *len))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for SequenceDictionary {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            contigs: iter.into_iter().map(|(n, l)| (n.into(), l)).collect(),
        }
    }
}

/// A genomic window: contig plus inclusive 1-based `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub contig: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl Region {
    pub fn new(contig: impl Into<String>, start: GenomicPos, end: GenomicPos) -> Result<Self, RegionError> {
        if start < 1 {
            return Err(RegionError::StartBeforeOne(start));
        }
        if start > end {
            return Err(RegionError::InvalidRange { start, end });
        }
        Ok(Self {
            contig: contig.into(),
            start,
            end,
        })
    }

    /// Number of bases in the window, always >= 1.
    pub fn len(&self) -> u64 {
        (self.end - self.start + 1) as u64
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, pos: GenomicPos) -> bool {
        pos >= self.start && pos <= self.end
    }

    /// Parse a region string, checking the contig against `dict` and clamping
    /// the end to the contig length. Without a dictionary only explicit
    /// coordinates are accepted.
    pub fn parse(text: &str, dict: Option<&SequenceDictionary>) -> Result<Self, RegionError> {
        let text = text.trim();
        let re = Regex::new(REGION_PATTERN).map_err(|_| RegionError::InvalidFormat(text.to_string()))?;
        let caps = re
            .captures(text)
            .ok_or_else(|| RegionError::InvalidFormat(text.to_string()))?;

        let contig = caps
            .name("contig")
            .map(|m| m.as_str())
            .ok_or_else(|| RegionError::InvalidFormat(text.to_string()))?;

        let contig_len = match dict {
            Some(dict) => Some(
                dict.length_of(contig)
                    .ok_or_else(|| RegionError::UnknownContig(contig.to_string()))?
                    as GenomicPos,
            ),
            None => None,
        };

        let (start, end) = match caps.name("start") {
            None => {
                let len = contig_len.ok_or_else(|| RegionError::NeedsDictionary(text.to_string()))?;
                (1, len)
            }
            Some(start) => {
                let start = parse_coordinate(start.as_str())?;
                if let Some(end) = caps.name("end") {
                    (start, parse_coordinate(end.as_str())?)
                } else if let Some(flank) = caps.name("flank") {
                    let flank = parse_coordinate(flank.as_str())?;
                    let end = start
                        .checked_add(flank)
                        .ok_or_else(|| RegionError::InvalidCoordinate(text.to_string()))?;
                    ((start - flank).max(1), end)
                } else {
                    (start, start)
                }
            }
        };

        let end = match contig_len {
            Some(len) if end > len && start <= len => len,
            _ => end,
        };

        Region::new(contig, start, end)
    }
}

const REGION_PATTERN: &str =
    r"^(?P<contig>[^:\s]+)(?::(?P<start>[0-9,]+)(?:-(?P<end>[0-9,]+)|\+(?P<flank>[0-9,]+))?)?$";

fn parse_coordinate(text: &str) -> Result<GenomicPos, RegionError> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    digits
        .parse::<GenomicPos>()
        .map_err(|_| RegionError::InvalidCoordinate(text.to_string()))
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::parse(s, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> SequenceDictionary {
        [("chr1", 5_000u64), ("chrM", 16_569u64)].into_iter().collect()
    }

    #[test]
    fn test_parse_start_end() {
        let r: Region = "chr1:100-110".parse().unwrap();
        assert_eq!(r.contig, "chr1");
        assert_eq!(r.start, 100);
        assert_eq!(r.end, 110);
        assert_eq!(r.len(), 11);
        assert_eq!(r.to_string(), "chr1:100-110");
    }

    #[test]
    fn test_parse_thousands_separators() {
        let r: Region = "chr1:1,000-2,500".parse().unwrap();
        assert_eq!((r.start, r.end), (1000, 2500));
    }

    #[test]
    fn test_parse_single_position_and_flank() {
        let r: Region = "chr1:150".parse().unwrap();
        assert_eq!((r.start, r.end), (150, 150));

        let r: Region = "chr1:150+20".parse().unwrap();
        assert_eq!((r.start, r.end), (130, 170));

        let r: Region = "chr1:5+20".parse().unwrap();
        assert_eq!((r.start, r.end), (1, 25));
    }

    #[test]
    fn test_flank_overflow_is_an_error() {
        assert!(matches!(
            Region::parse("chr1:9223372036854775800+100", None),
            Err(RegionError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_whole_contig_needs_dictionary() {
        assert!(matches!(
            "chrM".parse::<Region>(),
            Err(RegionError::NeedsDictionary(_))
        ));
        let r = Region::parse("chrM", Some(&dict())).unwrap();
        assert_eq!((r.start, r.end), (1, 16_569));
    }

    #[test]
    fn test_dictionary_checks_contig_and_clamps() {
        assert_eq!(
            Region::parse("chr2:1-10", Some(&dict())),
            Err(RegionError::UnknownContig("chr2".into()))
        );
        let r = Region::parse("chr1:4990-6000", Some(&dict())).unwrap();
        assert_eq!(r.end, 5_000);
    }

    #[test]
    fn test_reversed_and_malformed() {
        assert_eq!(
            "chr1:200-100".parse::<Region>(),
            Err(RegionError::InvalidRange { start: 200, end: 100 })
        );
        assert!(matches!("chr1:abc".parse::<Region>(), Err(RegionError::InvalidFormat(_))));
        assert!(matches!("".parse::<Region>(), Err(RegionError::InvalidFormat(_))));
        assert_eq!("chr1:0-10".parse::<Region>(), Err(RegionError::StartBeforeOne(0)));
    }

    #[test]
    fn test_contains() {
        let r = Region::new("chr1", 100, 110).unwrap();
        assert!(r.contains(100));
        assert!(r.contains(110));
        assert!(!r.contains(99));
        assert!(!r.contains(111));
    }
}
