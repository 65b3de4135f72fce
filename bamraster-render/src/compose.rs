/*!
Top-level image assembly.

[`CanvasLayout`] decides where each track goes; [`ImageComposer`] replays
every packed record through the walker and paints the tracks in order:
highlight background, contig label, ruler, reference, read rows, consensus,
depth, highlight outline. Consensus and depth are painted after the rows
because the walk is what fills them.
*/

use bamraster_core::{AlignmentRecord, RecordFilter};
use image::RgbImage;
use log::{debug, info};

use crate::aggregate::{Consensus, Depth};
use crate::canvas::Canvas;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::palette::StrokeColorizer;
use crate::pileup::{PileupPacker, Row};
use crate::reads::ReadRowRenderer;
use crate::tracks::{ruler_height, TrackRenderer};
use crate::walk::CigarWalker;

/// Largest canvas edge accepted, in pixels.
pub const MAX_DIMENSION: u64 = i32::MAX as u64;

/// Vertical offsets of every track, all in pixels from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub label_y: u32,
    pub ruler_y: u32,
    pub reference_y: u32,
    pub consensus_y: u32,
    pub depth_y: u32,
    /// Top of the first drawn row.
    pub rows_y: u32,
    /// Distance between the tops of two consecutive drawn rows.
    pub row_pitch: u32,
    pub drawn_rows: usize,
}

impl CanvasLayout {
    /// Layout for `row_count` packed rows. Only rows under the visibility
    /// limit take vertical space.
    pub fn compute(ctx: &RenderContext, row_count: usize) -> Result<Self, RenderError> {
        let gap = ctx.config.track_gap as u64;
        let row_height = ctx.row_height() as u64;
        let depth = ctx.config.depth_pixels() as u64;
        let drawn_rows = ctx.config.drawn_rows(row_count);

        let label_y = 0u64;
        let ruler_y = label_y + row_height + gap;
        let reference_y = ruler_y + ruler_height(ctx.region.end) as u64 + gap;
        let consensus_y = reference_y + row_height + gap;
        let depth_y = consensus_y + row_height + gap;
        let rows_y = depth_y + if depth > 0 { depth + gap } else { 0 };
        let row_pitch = row_height + gap;
        let height = rows_y + drawn_rows as u64 * row_pitch + gap;

        let width = ctx.mapper.width();
        if height > MAX_DIMENSION {
            return Err(RenderError::TooLarge { width, height });
        }
        // every offset is below `height`
        let px = |v: u64| v as u32;
        Ok(Self {
            width,
            height: px(height),
            label_y: px(label_y),
            ruler_y: px(ruler_y),
            reference_y: px(reference_y),
            consensus_y: px(consensus_y),
            depth_y: px(depth_y),
            rows_y: px(rows_y),
            row_pitch: px(row_pitch),
            drawn_rows,
        })
    }

    /// Top of the drawn row at `index`, `None` past the visible rows.
    pub fn row_y(&self, index: usize) -> Option<u32> {
        (index < self.drawn_rows).then(|| self.rows_y + index as u32 * self.row_pitch)
    }
}

/// A finished image with the counters accumulated while drawing it.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub image: RgbImage,
    pub layout: CanvasLayout,
    pub consensus: Consensus,
    pub depth: Depth,
}

pub struct ImageComposer<'a> {
    ctx: &'a RenderContext,
    colorizer: &'a dyn StrokeColorizer,
}

impl<'a> ImageComposer<'a> {
    pub fn new(ctx: &'a RenderContext, colorizer: &'a dyn StrokeColorizer) -> Self {
        Self { ctx, colorizer }
    }

    /// Paint already packed rows. Rows past the visibility limit are walked
    /// for consensus and depth but not drawn.
    pub fn render(&self, rows: &[Row]) -> Result<Rendering, RenderError> {
        let layout = CanvasLayout::compute(self.ctx, rows.len())?;
        info!(
            "Image: {}x{} for {} ({} rows, {} drawn)",
            layout.width,
            layout.height,
            self.ctx.region,
            rows.len(),
            layout.drawn_rows
        );

        let mut canvas = Canvas::new(layout.width, layout.height);
        let tracks = TrackRenderer::new(self.ctx);
        tracks.highlight_background(&mut canvas);
        tracks.contig_label(&mut canvas, layout.label_y);
        tracks.ruler(&mut canvas, layout.ruler_y);
        tracks.reference(&mut canvas, layout.reference_y);

        let walker = CigarWalker::new(self.ctx);
        let reads = ReadRowRenderer::new(self.ctx, self.colorizer);
        let mut consensus = Consensus::new();
        let mut depth = Depth::for_region(&self.ctx.region);

        for (index, row) in rows.iter().enumerate() {
            let y = layout.row_y(index);
            for record in row.records() {
                let walked = walker.walk(record, &mut consensus, &mut depth);
                if let Some(y) = y {
                    reads.draw(&mut canvas, record, y as f64, &walked.annotations);
                }
            }
            debug!("Row {}: {} reads{}", index, row.len(), if y.is_some() { "" } else { " (hidden)" });
        }

        tracks.consensus(&mut canvas, layout.consensus_y, &consensus);
        tracks.depth(&mut canvas, layout.depth_y, &depth);
        tracks.highlight_outline(&mut canvas);

        Ok(Rendering {
            image: canvas.into_image(),
            layout,
            consensus,
            depth,
        })
    }

    /// Pack a position-sorted record stream with `filter`, then render it.
    pub fn render_records<I, E>(&self, records: I, filter: &dyn RecordFilter) -> Result<Rendering, RenderError>
    where
        I: IntoIterator<Item = Result<AlignmentRecord, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let rows = PileupPacker::new(self.ctx, filter)
            .pack(records)
            .map_err(|e| RenderError::Source(e.into()))?;
        self.render(&rows)
    }
}
