//! Genomic position to pixel mapping.

use bamraster_core::{GenomicPos, Region};

use crate::error::RenderError;

/// Maps 1-based positions of an inclusive interval onto `[0, width]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    start: GenomicPos,
    end: GenomicPos,
    width: u32,
}

impl CoordinateMapper {
    pub fn new(start: GenomicPos, end: GenomicPos, width: u32) -> Result<Self, RenderError> {
        if end < start {
            return Err(RenderError::InvalidInterval { start, end });
        }
        if width == 0 {
            return Err(RenderError::ZeroWidth);
        }
        Ok(Self { start, end, width })
    }

    pub fn for_region(region: &Region, width: u32) -> Result<Self, RenderError> {
        Self::new(region.start, region.end, width)
    }

    pub fn start(&self) -> GenomicPos {
        self.start
    }

    pub fn end(&self) -> GenomicPos {
        self.end
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of bases in the interval.
    pub fn len(&self) -> u64 {
        (self.end - self.start + 1) as u64
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Left pixel edge of `pos`. Not rounded; positions outside the interval
    /// map outside `[0, width)`.
    pub fn to_x(&self, pos: GenomicPos) -> f64 {
        self.width as f64 * (pos - self.start) as f64 / self.len() as f64
    }

    pub fn base_width(&self, pos: GenomicPos) -> f64 {
        self.to_x(pos + 1) - self.to_x(pos)
    }

    /// Integer per-base width, at least 1. Height of fixed tracks and rows.
    pub fn row_height(&self) -> u32 {
        ((self.width as u64 / self.len()) as u32).max(1)
    }
}
