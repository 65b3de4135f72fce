//! Fixed tracks above the read rows: contig label, ruler, reference,
//! consensus and depth, plus the highlight overlay.

use bamraster_core::GenomicPos;

use crate::aggregate::{Consensus, Depth};
use crate::canvas::Canvas;
use crate::context::RenderContext;
use crate::format_thousands;
use crate::glyph::{paint_char, paint_text, paint_text_vertical};
use crate::palette::{base_color, depth_color, BLACK, HIGHLIGHT, LIGHT_GRAY, RED, WHITE};

/// Vertical pixels per character of a ruler label.
pub const RULER_PX_PER_CHAR: u32 = 20;

/// Ruler height for a region ending at `end`.
pub fn ruler_height(end: GenomicPos) -> u32 {
    format_thousands(end).len() as u32 * RULER_PX_PER_CHAR
}

pub struct TrackRenderer<'a> {
    ctx: &'a RenderContext,
}

impl<'a> TrackRenderer<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self { ctx }
    }

    /// Whole-pixel column width shared by highlights, label and depth bars.
    fn ref_width(&self) -> f64 {
        self.ctx.row_height() as f64
    }

    fn positions(&self) -> impl Iterator<Item = GenomicPos> {
        self.ctx.region.start..=self.ctx.region.end
    }

    /// Pale column behind every highlighted position.
    pub fn highlight_background(&self, canvas: &mut Canvas) {
        let height = canvas.height() as f64;
        for &pos in &self.ctx.config.highlights {
            canvas.fill_rect(self.ctx.mapper.to_x(pos), 0.0, self.ref_width(), height, HIGHLIGHT);
        }
    }

    /// Red outline around every highlighted column, drawn last.
    pub fn highlight_outline(&self, canvas: &mut Canvas) {
        let height = canvas.height() as f64;
        for &pos in &self.ctx.config.highlights {
            canvas.stroke_rect(self.ctx.mapper.to_x(pos), 0.0, self.ref_width(), height - 1.0, RED);
        }
    }

    pub fn contig_label(&self, canvas: &mut Canvas, y: u32) {
        let contig = &self.ctx.region.contig;
        paint_text(
            canvas,
            contig,
            1.0,
            y as f64 + 1.0,
            contig.len() as f64 * self.ref_width(),
            self.ctx.row_height() as f64,
            BLACK,
        );
    }

    /// Full-height base boundaries and a rotated coordinate every ten bases.
    pub fn ruler(&self, canvas: &mut Canvas, y: u32) {
        let mapper = &self.ctx.mapper;
        let bottom = canvas.height() as f64;
        let label_height = ruler_height(self.ctx.region.end) as f64;
        for pos in self.positions() {
            let color = if pos % 10 == 0 { BLACK } else { LIGHT_GRAY };
            canvas.vline(mapper.to_x(pos), 0.0, bottom, color);

            if (pos - self.ctx.region.start) % 10 == 0 {
                let bw = mapper.base_width(pos);
                paint_text_vertical(
                    canvas,
                    &format_thousands(pos),
                    mapper.to_x(pos + 1) - bw,
                    y as f64,
                    bw,
                    label_height,
                    BLACK,
                );
            }
        }
    }

    /// One glyph per reference base, `N` without a sequence.
    pub fn reference(&self, canvas: &mut Canvas, y: u32) {
        let mapper = &self.ctx.mapper;
        for pos in self.positions() {
            let base = self.ctx.reference.base_at(pos);
            let bw = mapper.base_width(pos);
            paint_char(canvas, base, mapper.to_x(pos) + 1.0, y as f64, bw - 2.0, bw - 2.0, base_color(base));
        }
    }

    /// Observed bases per column, widest share first. Bases differing from
    /// the reference are red, so every call is red against `N`.
    pub fn consensus(&self, canvas: &mut Canvas, y: u32, consensus: &Consensus) {
        let mapper = &self.ctx.mapper;
        for pos in self.positions() {
            let slices = consensus.slices(pos, mapper);
            if slices.is_empty() {
                continue;
            }
            let reference = self.ctx.reference.base_at(pos).to_ascii_uppercase();
            let height = mapper.base_width(pos) - 1.0 - 2.0;
            for slice in slices {
                let color = if reference != slice.base { RED } else { BLACK };
                paint_char(canvas, slice.base, slice.x, y as f64, slice.width, height, color);
            }
        }
    }

    /// Depth bars with their `Depth [min - max]` legend. No-op when the
    /// track is disabled.
    pub fn depth(&self, canvas: &mut Canvas, y: u32, depth: &Depth) {
        let track = self.ctx.config.depth_pixels();
        if track == 0 {
            return;
        }
        let mapper = &self.ctx.mapper;
        let refw = self.ref_width();
        let bottom = y as f64 + track as f64;
        for (i, &value) in depth.values().iter().enumerate() {
            let h = depth.bar_height(value, track);
            let x = mapper.to_x(self.ctx.region.start + i as GenomicPos);
            canvas.fill_rect(x, bottom - h, refw, h, depth_color(value));
            canvas.stroke_rect(x, bottom - h, refw, h, BLACK);
        }

        let (min, max) = depth.range();
        let label = format!("Depth [{} - {}]", min, max);
        let feature = self.ctx.row_height() as f64;
        for (k, color) in [(0.0, WHITE), (1.0, BLACK)] {
            paint_text(
                canvas,
                &label,
                1.0 + k,
                bottom - feature + k,
                label.len() as f64 * refw,
                feature,
                color,
            );
        }
    }
}
