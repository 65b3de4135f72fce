//! Greedy first-fit packing of reads into rows.
//!
//! Input must be sorted by alignment start. A record goes into the first row
//! whose last record ends at least `min_horizontal_gap` pixels to its left;
//! otherwise it opens a new row. Single pass, order dependent.

use std::convert::Infallible;

use bamraster_core::{AlignmentRecord, RecordFilter};
use log::debug;

use crate::context::RenderContext;

/// Records stacked on one horizontal line, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    records: Vec<AlignmentRecord>,
}

impl Row {
    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&AlignmentRecord> {
        self.records.last()
    }
}

pub struct PileupPacker<'a> {
    ctx: &'a RenderContext,
    filter: &'a dyn RecordFilter,
}

impl<'a> PileupPacker<'a> {
    pub fn new(ctx: &'a RenderContext, filter: &'a dyn RecordFilter) -> Self {
        Self { ctx, filter }
    }

    fn left_px(&self, record: &AlignmentRecord) -> f64 {
        self.ctx.mapper.to_x(record.start(self.ctx.config.show_clipping))
    }

    fn right_px(&self, record: &AlignmentRecord) -> f64 {
        self.ctx.mapper.to_x(record.end(self.ctx.config.show_clipping))
    }

    /// Whether `candidate` may follow `last` in the same row.
    pub fn fits_after(&self, last: &AlignmentRecord, candidate: &AlignmentRecord) -> bool {
        self.right_px(last) + self.ctx.config.min_horizontal_gap <= self.left_px(candidate)
    }

    /// Pack a fallible record stream. The first source error aborts packing.
    pub fn pack<I, E>(&self, records: I) -> Result<Vec<Row>, E>
    where
        I: IntoIterator<Item = Result<AlignmentRecord, E>>,
    {
        let show_clipping = self.ctx.config.show_clipping;
        let region = &self.ctx.region;
        let mut rows: Vec<Row> = Vec::new();
        let mut seen = 0usize;

        for result in records {
            let record = result?;
            seen += 1;

            if record.flags.is_unmapped() || !self.filter.accept(&record) {
                continue;
            }
            if record.contig != region.contig {
                continue;
            }
            if record.end(show_clipping) < region.start {
                continue;
            }
            if record.start(show_clipping) > region.end {
                break;
            }

            match rows
                .iter_mut()
                .find(|row| row.last().map_or(true, |last| self.fits_after(last, &record)))
            {
                Some(row) => row.records.push(record),
                None => rows.push(Row { records: vec![record] }),
            }
        }

        debug!(
            "Packed {} records into {} rows ({} read from source)",
            rows.iter().map(Row::len).sum::<usize>(),
            rows.len(),
            seen
        );
        Ok(rows)
    }

    /// Pack records that cannot fail.
    pub fn pack_all<I>(&self, records: I) -> Vec<Row>
    where
        I: IntoIterator<Item = AlignmentRecord>,
    {
        match self.pack(records.into_iter().map(Ok::<_, Infallible>)) {
            Ok(rows) => rows,
            Err(never) => match never {},
        }
    }
}
