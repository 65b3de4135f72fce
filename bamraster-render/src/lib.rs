/*!
# bamraster Rendering Engine

Lays out an alignment pileup and paints it into a single raster image.

## Architecture

A render is one synchronous pass over position-sorted records:
1. **Packing**: records are filtered and greedily stacked into rows
2. **Walking**: every record's CIGAR is replayed against the reference,
   producing per-base annotations and feeding the consensus and depth counters
3. **Composing**: label, ruler, reference, consensus, depth and read rows are
   drawn top to bottom into one canvas

Everything here is CPU-only and owned by the in-flight render.
*/

pub mod error;
pub mod coords;
pub mod context;
pub mod config;
pub mod pileup;
pub mod walk;
pub mod aggregate;
pub mod palette;
pub mod canvas;
pub mod glyph;
pub mod tracks;
pub mod reads;
pub mod compose;
pub mod export;

pub use error::RenderError;
pub use coords::CoordinateMapper;
pub use context::RenderContext;
pub use config::{RenderConfig, StrokePolicy};
pub use pileup::{PileupPacker, Row};
pub use walk::{Annotation, CigarWalker, WalkOutput};
pub use aggregate::{Consensus, ConsensusSlice, Depth};
pub use palette::{MappingQualityColorizer, RuleColorizer, StrokeColorizer};
pub use canvas::{Canvas, Shape};
pub use compose::{CanvasLayout, ImageComposer, Rendering};
pub use reads::ReadRowRenderer;
pub use tracks::TrackRenderer;
pub use export::OutputFormat;

/// Minimum image width in pixels; narrower requests are raised to this.
pub const MIN_WIDTH: u32 = 100;

/// Format an integer with `,` thousands separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
