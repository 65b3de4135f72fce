//! Render settings shared by every track.

use bamraster_core::GenomicPos;
use serde::{Deserialize, Serialize};

use crate::MIN_WIDTH;

/// How the outline colour of a read is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokePolicy {
    /// Pairing, mate and duplicate flags.
    #[default]
    Flags,
    /// Grey level equal to the mapping quality.
    Mapq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Hide matching read bases
    #[serde(default)]
    pub hide_bases: bool,

    /// Draw soft and hard clips and lay reads out by their unclipped span
    #[serde(default)]
    pub show_clipping: bool,

    /// Print the read name over the read instead of its bases
    #[serde(default)]
    pub print_name: bool,

    /// Minimum horizontal pixel gap between two reads sharing a row
    #[serde(default = "default_min_gap")]
    pub min_horizontal_gap: f64,

    /// Maximum number of drawn rows, negative for no limit
    #[serde(default = "default_max_rows")]
    pub max_rows: i64,

    /// Height of the depth histogram, 0 disables it
    #[serde(default = "default_depth_height")]
    pub depth_height: i32,

    /// Fill reads with a grey gradient instead of a flat colour
    #[serde(default = "default_true")]
    pub read_gradient: bool,

    /// Positions drawn with a highlighted column
    #[serde(default)]
    pub highlights: Vec<GenomicPos>,

    /// Vertical gap between tracks and rows
    #[serde(default = "default_track_gap")]
    pub track_gap: u32,

    #[serde(default)]
    pub stroke: StrokePolicy,
}

fn default_width() -> u32 { 1000 }
fn default_min_gap() -> f64 { 2.0 }
fn default_max_rows() -> i64 { -1 }
fn default_depth_height() -> i32 { 100 }
fn default_true() -> bool { true }
fn default_track_gap() -> u32 { 4 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            hide_bases: false,
            show_clipping: false,
            print_name: false,
            min_horizontal_gap: default_min_gap(),
            max_rows: default_max_rows(),
            depth_height: default_depth_height(),
            read_gradient: true,
            highlights: Vec::new(),
            track_gap: default_track_gap(),
            stroke: StrokePolicy::default(),
        }
    }
}

impl RenderConfig {
    /// Width actually used for the canvas.
    pub fn effective_width(&self) -> u32 {
        if self.width < MIN_WIDTH {
            log::info!("Raising image width from {} to {}", self.width, MIN_WIDTH);
            MIN_WIDTH
        } else {
            self.width
        }
    }

    /// Depth track height in pixels, 0 when disabled.
    pub fn depth_pixels(&self) -> u32 {
        self.depth_height.max(0) as u32
    }

    /// Rows that take vertical space out of `total`.
    pub fn drawn_rows(&self, total: usize) -> usize {
        if self.max_rows < 0 {
            total
        } else {
            total.min(self.max_rows as usize)
        }
    }
}
