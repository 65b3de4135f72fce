//! Consensus and depth counters filled by the CIGAR walk.

use std::collections::BTreeMap;

use bamraster_core::{GenomicPos, Region};

use crate::coords::CoordinateMapper;

/// Base calls observed at each reference position, uppercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consensus {
    counts: BTreeMap<GenomicPos, BTreeMap<u8, u32>>,
}

/// One horizontal share of a consensus column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusSlice {
    pub base: u8,
    pub count: u32,
    pub x: f64,
    pub width: f64,
}

impl Consensus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, pos: GenomicPos, base: u8) {
        *self
            .counts
            .entry(pos)
            .or_default()
            .entry(base.to_ascii_uppercase())
            .or_insert(0) += 1;
    }

    pub fn total_at(&self, pos: GenomicPos) -> u32 {
        self.counts.get(&pos).map_or(0, |c| c.values().sum())
    }

    /// Counts by descending frequency, ties by ascending base.
    pub fn counts_at(&self, pos: GenomicPos) -> Vec<(u8, u32)> {
        let mut counts: Vec<(u8, u32)> = self
            .counts
            .get(&pos)
            .map(|c| c.iter().map(|(b, n)| (*b, *n)).collect())
            .unwrap_or_default();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }

    /// Split the column at `pos` proportionally to counts. The first slice
    /// starts one pixel into the column and the widths add up to the base
    /// width minus that inset. Empty when nothing was observed.
    pub fn slices(&self, pos: GenomicPos, mapper: &CoordinateMapper) -> Vec<ConsensusSlice> {
        let total = self.total_at(pos);
        if total == 0 {
            return Vec::new();
        }
        let inner = mapper.base_width(pos) - 1.0;
        let mut x = mapper.to_x(pos) + 1.0;
        self.counts_at(pos)
            .into_iter()
            .map(|(base, count)| {
                let width = inner * count as f64 / total as f64;
                let slice = ConsensusSlice { base, count, x, width };
                x += width;
                slice
            })
            .collect()
    }
}

/// Aligned-base count per in-region position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Depth {
    start: GenomicPos,
    counts: Vec<u32>,
}

impl Depth {
    pub fn for_region(region: &Region) -> Self {
        Self {
            start: region.start,
            counts: vec![0; region.len() as usize],
        }
    }

    fn index(&self, pos: GenomicPos) -> Option<usize> {
        let offset = pos - self.start;
        if offset < 0 || offset as usize >= self.counts.len() {
            None
        } else {
            Some(offset as usize)
        }
    }

    /// Positions outside the region are ignored.
    pub fn increment(&mut self, pos: GenomicPos) {
        if let Some(i) = self.index(pos) {
            self.counts[i] += 1;
        }
    }

    pub fn get(&self, pos: GenomicPos) -> u32 {
        self.index(pos).map_or(0, |i| self.counts[i])
    }

    pub fn values(&self) -> &[u32] {
        &self.counts
    }

    /// `(min, max)` for normalisation; `min` is lowered by one when flat so
    /// the scale never collapses.
    pub fn range(&self) -> (i64, i64) {
        let min = self.counts.iter().copied().min().unwrap_or(0) as i64;
        let max = self.counts.iter().copied().max().unwrap_or(1) as i64;
        if min == max {
            (min - 1, max)
        } else {
            (min, max)
        }
    }

    /// Bar height for `value` in a track `height` pixels tall.
    pub fn bar_height(&self, value: u32, height: u32) -> f64 {
        let (min, max) = self.range();
        (value as i64 - min) as f64 / (max - min) as f64 * height as f64
    }
}
