//! Per-base replay of a record's CIGAR against the reference.
//!
//! The walk classifies every span, feeds the consensus and depth counters and
//! returns drawing instructions. It never touches a canvas.

use std::collections::BTreeSet;

use bamraster_core::{AlignmentRecord, CigarOp, GenomicPos};
use log::warn;

use crate::aggregate::{Consensus, Depth};
use crate::context::RenderContext;

/// One drawing instruction produced by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// Clip block over `[start, end)`.
    Clip { start: GenomicPos, end: GenomicPos },
    /// Soft-clipped base shown in an in-region column. `base` picks the colour.
    ClippedBase { pos: GenomicPos, base: u8, glyph: u8 },
    /// Deletion or skip block over `[start, end)`.
    Deletion { start: GenomicPos, end: GenomicPos },
    /// Aligned base in an in-region column. `glyph` is `None` when hidden.
    Base {
        pos: GenomicPos,
        base: u8,
        glyph: Option<u8>,
        mismatch: bool,
    },
    /// Insertion before `pos`.
    Insertion { pos: GenomicPos },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    pub annotations: Vec<Annotation>,
    /// Reference position after the last span.
    pub ref_cursor: GenomicPos,
    /// 0-based read offset after the last span.
    pub read_cursor: usize,
}

pub struct CigarWalker<'a> {
    ctx: &'a RenderContext,
}

impl<'a> CigarWalker<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self { ctx }
    }

    fn glyph_for(&self, record: &AlignmentRecord, read_pos: usize, base: u8) -> u8 {
        if self.ctx.config.print_name {
            record.name_char_at(read_pos)
        } else {
            base
        }
    }

    fn is_mismatch(op: CigarOp, read_base: u8, ref_base: u8) -> bool {
        op == CigarOp::SequenceMismatch
            || (!ref_base.eq_ignore_ascii_case(&b'N') && !ref_base.eq_ignore_ascii_case(&read_base))
    }

    pub fn walk(&self, record: &AlignmentRecord, consensus: &mut Consensus, depth: &mut Depth) -> WalkOutput {
        let config = &self.ctx.config;
        let mut ref_pos = record.start(config.show_clipping);
        let mut read_pos = 0usize;
        let mut annotations = Vec::new();
        let mut insertions = BTreeSet::new();

        for span in record.cigar.iter() {
            let len = span.len as GenomicPos;
            match span.op {
                CigarOp::SoftClip | CigarOp::HardClip => {
                    // the walk already starts at the aligned start
                    if !config.show_clipping {
                        if span.op == CigarOp::SoftClip {
                            read_pos += span.len as usize;
                        }
                        continue;
                    }
                    annotations.push(Annotation::Clip {
                        start: ref_pos,
                        end: ref_pos + len,
                    });
                    if span.op == CigarOp::SoftClip {
                        for i in 0..span.len as usize {
                            let pos = ref_pos + i as GenomicPos;
                            if !self.ctx.in_region(pos) {
                                continue;
                            }
                            let base = record.base_at(read_pos + i);
                            annotations.push(Annotation::ClippedBase {
                                pos,
                                base,
                                glyph: self.glyph_for(record, read_pos + i, base),
                            });
                        }
                        read_pos += span.len as usize;
                    }
                    ref_pos += len;
                }
                CigarOp::Insertion => {
                    insertions.insert(ref_pos);
                    read_pos += span.len as usize;
                }
                CigarOp::Deletion | CigarOp::Skip => {
                    annotations.push(Annotation::Deletion {
                        start: ref_pos,
                        end: ref_pos + len,
                    });
                    ref_pos += len;
                }
                CigarOp::Pad => {}
                CigarOp::Match | CigarOp::SequenceMatch | CigarOp::SequenceMismatch => {
                    for _ in 0..span.len {
                        let base = record.base_at(read_pos);
                        consensus.increment(ref_pos, base);

                        if self.ctx.in_region(ref_pos) {
                            depth.increment(ref_pos);

                            let ref_base = self.ctx.reference.base_at(ref_pos);
                            let mismatch = Self::is_mismatch(span.op, base, ref_base);
                            let glyph = if config.print_name {
                                Some(record.name_char_at(read_pos))
                            } else if mismatch || !config.hide_bases {
                                Some(base)
                            } else {
                                None
                            };
                            annotations.push(Annotation::Base {
                                pos: ref_pos,
                                base,
                                glyph,
                                mismatch,
                            });
                        }
                        read_pos += 1;
                        ref_pos += 1;
                    }
                }
                CigarOp::Other(c) => {
                    warn!("CIGAR operator '{}' of read {} not handled, skipping", c, record.name);
                }
            }
        }

        annotations.extend(insertions.into_iter().map(|pos| Annotation::Insertion { pos }));

        WalkOutput {
            annotations,
            ref_cursor: ref_pos,
            read_cursor: read_pos,
        }
    }
}
