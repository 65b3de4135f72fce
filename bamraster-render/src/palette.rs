//! Colours and read outline policies.

use bamraster_core::AlignmentRecord;
use image::Rgb;

use crate::config::StrokePolicy;

pub type Color = Rgb<u8>;

pub const BLACK: Color = Rgb([0, 0, 0]);
pub const WHITE: Color = Rgb([255, 255, 255]);
pub const RED: Color = Rgb([255, 0, 0]);
pub const GREEN: Color = Rgb([0, 255, 0]);
pub const BLUE: Color = Rgb([0, 0, 255]);
pub const YELLOW: Color = Rgb([255, 255, 0]);
pub const ORANGE: Color = Rgb([255, 200, 0]);
pub const PINK: Color = Rgb([255, 175, 175]);
pub const LIGHT_GRAY: Color = Rgb([192, 192, 192]);
pub const DARK_GRAY: Color = Rgb([64, 64, 64]);
/// Flat read fill when gradients are off.
pub const NAVAJO_WHITE: Color = Rgb([255, 222, 173]);
/// Background of highlighted columns.
pub const HIGHLIGHT: Color = Rgb([255, 235, 246]);

/// Nucleotide colour, case-insensitive.
pub fn base_color(base: u8) -> Color {
    match base.to_ascii_uppercase() {
        b'N' => BLACK,
        b'A' => RED,
        b'T' => GREEN,
        b'G' => YELLOW,
        b'C' => BLUE,
        _ => ORANGE,
    }
}

/// Depth bar colour by absolute depth.
pub fn depth_color(depth: u32) -> Color {
    if depth < 10 {
        RED
    } else if depth < 50 {
        BLUE
    } else {
        GREEN
    }
}

/// Linear blend between `a` (t = 0) and `b` (t = 1).
pub fn mix(a: Color, b: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Rgb([lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2])])
}

/// Picks the outline colour of a read.
pub trait StrokeColorizer {
    fn color(&self, record: &AlignmentRecord) -> Color;
}

type Predicate = Box<dyn Fn(&AlignmentRecord) -> bool>;

/// Ordered predicate to colour table; the first matching rule wins.
pub struct RuleColorizer {
    rules: Vec<(Predicate, Color)>,
    fallback: Color,
}

impl RuleColorizer {
    pub fn new(fallback: Color) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    pub fn rule<F>(mut self, predicate: F, color: Color) -> Self
    where
        F: Fn(&AlignmentRecord) -> bool + 'static,
    {
        self.rules.push((Box::new(predicate), color));
        self
    }

    /// Black for unpaired or properly paired reads, then blue for an unmapped
    /// mate, green for duplicates and orange for the rest.
    pub fn by_flags() -> Self {
        Self::new(ORANGE)
            .rule(|r| !r.flags.is_paired() || r.flags.is_proper_pair(), BLACK)
            .rule(|r| r.flags.is_mate_unmapped(), BLUE)
            .rule(|r| r.flags.is_duplicate(), GREEN)
    }
}

impl StrokeColorizer for RuleColorizer {
    fn color(&self, record: &AlignmentRecord) -> Color {
        self.rules
            .iter()
            .find(|(predicate, _)| predicate(record))
            .map_or(self.fallback, |(_, color)| *color)
    }
}

/// Grey level equal to the mapping quality.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingQualityColorizer;

impl StrokeColorizer for MappingQualityColorizer {
    fn color(&self, record: &AlignmentRecord) -> Color {
        let q = record.mapping_quality;
        Rgb([q, q, q])
    }
}

pub fn colorizer_for(policy: StrokePolicy) -> Box<dyn StrokeColorizer> {
    match policy {
        StrokePolicy::Flags => Box::new(RuleColorizer::by_flags()),
        StrokePolicy::Mapq => Box::new(MappingQualityColorizer),
    }
}
