//! Immutable state shared by the components of one render.

use bamraster_core::{GenomicPos, ReferenceSequence, Region};

use crate::config::RenderConfig;
use crate::coords::CoordinateMapper;
use crate::error::RenderError;

#[derive(Debug, Clone)]
pub struct RenderContext {
    pub region: Region,
    pub mapper: CoordinateMapper,
    pub reference: ReferenceSequence,
    pub config: RenderConfig,
}

impl RenderContext {
    /// Build the context, raising the width to the minimum when needed.
    pub fn new(region: Region, reference: ReferenceSequence, config: RenderConfig) -> Result<Self, RenderError> {
        let mapper = CoordinateMapper::for_region(&region, config.effective_width())?;
        Ok(Self {
            region,
            mapper,
            reference,
            config,
        })
    }

    pub fn row_height(&self) -> u32 {
        self.mapper.row_height()
    }

    pub fn in_region(&self, pos: GenomicPos) -> bool {
        self.region.contains(pos)
    }
}
