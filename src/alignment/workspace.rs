//! Per-call scratch buffers for the affine-gap kernels.
//!
//! One acquisition per kernel invocation, sized from the input dimensions
//! and released on every exit path when the struct drops. The row buffers
//! are swapped between rows, never reallocated.

use crate::alignment::score::CompoundScore;

pub struct AlignScratch {
    /// Best scores in the current a-row.
    pub s: Vec<CompoundScore>,
    /// Best scores in the previous a-row.
    pub sm: Vec<CompoundScore>,
    /// Best score ending in a B-gap, per column.
    pub gapb: Vec<CompoundScore>,
    /// Traceback flags, `(na + 1) * (nb + 1)` bytes with row stride `nb + 1`.
    pub bitmap: Vec<u8>,
}

impl AlignScratch {
    pub fn new(na: usize, nb: usize) -> Self {
        AlignScratch {
            s: vec![CompoundScore::ZERO; nb + 1],
            sm: vec![CompoundScore::ZERO; nb + 1],
            gapb: vec![CompoundScore::ZERO; nb + 1],
            bitmap: vec![0u8; (na + 1) * (nb + 1)],
        }
    }
}
