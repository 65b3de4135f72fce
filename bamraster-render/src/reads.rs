//! Drawing of one packed read: its arrow body, outline and per-base marks.

use bamraster_core::{AlignmentRecord, Strand};

use crate::canvas::{Canvas, Shape};
use crate::context::RenderContext;
use crate::glyph::paint_char;
use crate::palette::{base_color, mix, StrokeColorizer, DARK_GRAY, GREEN, NAVAJO_WHITE, ORANGE, PINK, RED, WHITE};
use crate::walk::Annotation;

/// Reads narrower than this are drawn as plain rectangles.
const MIN_ARROW_WIDTH: f64 = 2.0;
const MAX_ARROW_WIDTH: f64 = 5.0;
const STROKE_WIDTH: f64 = 2.0;
const INSERTION_WIDTH: f64 = 2.0;

pub struct ReadRowRenderer<'a> {
    ctx: &'a RenderContext,
    colorizer: &'a dyn StrokeColorizer,
}

impl<'a> ReadRowRenderer<'a> {
    pub fn new(ctx: &'a RenderContext, colorizer: &'a dyn StrokeColorizer) -> Self {
        Self { ctx, colorizer }
    }

    /// Outline of `record` in the row whose top is `y0`: an arrow pointing
    /// along the strand, or a rectangle when too narrow for one. Spans from
    /// the left edge of the first base to the left edge of the last.
    pub fn read_shape(&self, record: &AlignmentRecord, y0: f64) -> Shape {
        let show_clipping = self.ctx.config.show_clipping;
        let x0 = self.ctx.mapper.to_x(record.start(show_clipping));
        let x1 = self.ctx.mapper.to_x(record.end(show_clipping));
        let y1 = y0 + self.ctx.row_height() as f64;
        let width = x1 - x0;
        if width < MIN_ARROW_WIDTH {
            return Shape::rect(x0, y0, width, y1 - y0);
        }
        let arrow = width.clamp(MIN_ARROW_WIDTH, MAX_ARROW_WIDTH);
        let mid = (y0 + y1) / 2.0;
        let points = match record.strand() {
            Strand::Forward => vec![(x0, y0), (x1 - arrow, y0), (x1, mid), (x1 - arrow, y1), (x0, y1)],
            Strand::Reverse => vec![(x0 + arrow, y0), (x0, mid), (x0 + arrow, y1), (x1, y1), (x1, y0)],
        };
        Shape::Polygon(points)
    }

    fn fill_body(&self, canvas: &mut Canvas, shape: &Shape) {
        if !self.ctx.config.read_gradient {
            canvas.fill_shape(shape, NAVAJO_WHITE);
            return;
        }
        let (_, top, _, bottom) = shape.bounds();
        let half = (bottom - top) / 2.0;
        let mid = top + half;
        canvas.fill_shape_with(shape, |y| {
            if half <= 0.0 {
                WHITE
            } else {
                mix(WHITE, DARK_GRAY, (y - mid).abs() / half)
            }
        });
    }

    fn cell(&self, start: i64, end: i64, y0: f64) -> (f64, f64, f64, f64) {
        let x = self.ctx.mapper.to_x(start);
        (x, y0, self.ctx.mapper.to_x(end) - x, self.ctx.row_height() as f64)
    }

    fn annotate(&self, canvas: &mut Canvas, annotation: &Annotation, y0: f64) {
        match *annotation {
            Annotation::Clip { start, end } => {
                let (x, y, w, h) = self.cell(start, end, y0);
                canvas.fill_rect(x, y, w, h, PINK);
            }
            Annotation::ClippedBase { pos, base, glyph } => {
                let (x, y, w, h) = self.cell(pos, pos + 1, y0);
                paint_char(canvas, glyph, x, y, w, h, base_color(base));
            }
            Annotation::Deletion { start, end } => {
                let (x, y, w, h) = self.cell(start, end, y0);
                canvas.fill_rect(x, y, w, h, ORANGE);
            }
            Annotation::Base { pos, base, glyph, mismatch } => {
                let (x, y, w, h) = self.cell(pos, pos + 1, y0);
                let color = if mismatch {
                    canvas.fill_rect(x, y, w, h, RED);
                    WHITE
                } else {
                    base_color(base)
                };
                if let Some(glyph) = glyph {
                    paint_char(canvas, glyph, x, y, w, h, color);
                }
            }
            Annotation::Insertion { pos } => {
                let x = self.ctx.mapper.to_x(pos);
                canvas.fill_rect(x, y0, INSERTION_WIDTH, self.ctx.row_height() as f64, GREEN);
            }
        }
    }

    /// Paint the read body, its outline, then the walk's annotations clipped
    /// to the body.
    pub fn draw(&self, canvas: &mut Canvas, record: &AlignmentRecord, y0: f64, annotations: &[Annotation]) {
        let shape = self.read_shape(record, y0);
        self.fill_body(canvas, &shape);
        canvas.stroke_shape(&shape, STROKE_WIDTH, self.colorizer.color(record));

        canvas.set_clip(Some(shape));
        for annotation in annotations {
            self.annotate(canvas, annotation, y0);
        }
        canvas.set_clip(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::palette::{RuleColorizer, BLACK};
    use bamraster_core::{Flags, ReferenceSequence, Region};

    fn ctx(config: RenderConfig) -> RenderContext {
        RenderContext::new(Region::new("chr1", 100, 110).unwrap(), ReferenceSequence::Synthetic, config).unwrap()
    }

    fn wide() -> RenderConfig {
        RenderConfig { width: 1100, ..Default::default() }
    }

    fn read(start: i64, cigar: &str) -> AlignmentRecord {
        AlignmentRecord::new("r", "chr1", start, cigar.parse().unwrap(), Vec::new())
    }

    #[test]
    fn test_forward_arrow_points_right() {
        let ctx = ctx(wide());
        let colorizer = RuleColorizer::by_flags();
        let renderer = ReadRowRenderer::new(&ctx, &colorizer);
        let shape = renderer.read_shape(&read(102, "3M"), 10.0);
        assert_eq!(
            shape,
            Shape::Polygon(vec![(200.0, 10.0), (395.0, 10.0), (400.0, 60.0), (395.0, 110.0), (200.0, 110.0)])
        );
    }

    #[test]
    fn test_reverse_arrow_points_left() {
        let ctx = ctx(wide());
        let colorizer = RuleColorizer::by_flags();
        let renderer = ReadRowRenderer::new(&ctx, &colorizer);
        let shape = renderer.read_shape(&read(102, "3M").with_flags(Flags::REVERSE), 0.0);
        assert_eq!(
            shape,
            Shape::Polygon(vec![(205.0, 0.0), (200.0, 50.0), (205.0, 100.0), (400.0, 100.0), (400.0, 0.0)])
        );
    }

    #[test]
    fn test_narrow_read_is_rectangle() {
        // 5000 bases over 1000 px: one base is 0.2 px
        let ctx = RenderContext::new(
            Region::new("chr1", 1, 5000).unwrap(),
            ReferenceSequence::Synthetic,
            RenderConfig::default(),
        )
        .unwrap();
        let colorizer = RuleColorizer::by_flags();
        let renderer = ReadRowRenderer::new(&ctx, &colorizer);
        assert!(matches!(renderer.read_shape(&read(10, "5M"), 0.0), Shape::Rect { .. }));
    }

    #[test]
    fn test_flat_fill_and_stroke() {
        let ctx = ctx(RenderConfig { read_gradient: false, ..wide() });
        let colorizer = RuleColorizer::by_flags();
        let renderer = ReadRowRenderer::new(&ctx, &colorizer);
        let mut canvas = Canvas::new(1100, 100);
        renderer.draw(&mut canvas, &read(102, "3M"), 0.0, &[]);
        assert_eq!(canvas.pixel(300, 50), NAVAJO_WHITE);
        assert_eq!(canvas.pixel(200, 50), BLACK);
        assert_eq!(canvas.pixel(150, 50), WHITE);
    }

    #[test]
    fn test_gradient_is_dark_at_edges() {
        let ctx = ctx(wide());
        let colorizer = RuleColorizer::by_flags();
        let renderer = ReadRowRenderer::new(&ctx, &colorizer);
        let mut canvas = Canvas::new(1100, 100);
        renderer.draw(&mut canvas, &read(102, "3M"), 0.0, &[]);
        let centre = canvas.pixel(300, 50);
        let edge = canvas.pixel(300, 2);
        assert!(centre[0] > 240);
        assert!(edge[0] < centre[0]);
    }

    #[test]
    fn test_annotations_are_clipped_to_body() {
        let ctx = ctx(RenderConfig { read_gradient: false, ..wide() });
        let colorizer = RuleColorizer::by_flags();
        let renderer = ReadRowRenderer::new(&ctx, &colorizer);
        let mut canvas = Canvas::new(1100, 100);
        // deletion block reaching past the read end
        let annotations = [Annotation::Deletion { start: 103, end: 108 }, Annotation::Insertion { pos: 102 }];
        renderer.draw(&mut canvas, &read(102, "3M"), 0.0, &annotations);
        assert_eq!(canvas.pixel(350, 50), ORANGE);
        assert_eq!(canvas.pixel(600, 50), WHITE);
        assert_eq!(canvas.pixel(200, 50), GREEN);
        assert_eq!(canvas.pixel(202, 50), NAVAJO_WHITE);
    }

    #[test]
    fn test_mismatch_cell_is_red() {
        let ctx = ctx(RenderConfig { read_gradient: false, ..wide() });
        let colorizer = RuleColorizer::by_flags();
        let renderer = ReadRowRenderer::new(&ctx, &colorizer);
        let mut canvas = Canvas::new(1100, 100);
        let annotations = [Annotation::Base { pos: 103, base: b'A', glyph: None, mismatch: true }];
        renderer.draw(&mut canvas, &read(102, "3M"), 0.0, &annotations);
        assert_eq!(canvas.pixel(350, 50), RED);
        assert_eq!(canvas.pixel(250, 50), NAVAJO_WHITE);
    }
}
