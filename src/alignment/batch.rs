//! Parallel alignment of independent sequence pairs.

use rayon::prelude::*;

use crate::alignment::cigar::Cigar;
use crate::alignment::gotoh::{glb_align, lcl_align, sg_align};
use crate::alignment::matrix::ScoreMatrix;

/// Which kernel a batch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignMode {
    Global,
    Local,
    SemiGlobal { pinleft: bool, pinright: bool },
}

/// Align every pair in parallel. Scratch is per task; the matrix is shared
/// by reference across workers.
pub fn align_batch(
    pairs: &[(&[u8], &[u8])],
    mode: AlignMode,
    rho: i32,
    sigma: i32,
    delta: &ScoreMatrix,
) -> Vec<Cigar> {
    log::debug!("aligning batch of {} pairs ({mode:?})", pairs.len());
    pairs
        .par_iter()
        .map(|&(a, b)| match mode {
            AlignMode::Global => glb_align(a, b, rho, sigma, delta),
            AlignMode::Local => lcl_align(a, b, rho, sigma, delta),
            AlignMode::SemiGlobal { pinleft, pinright } => {
                sg_align(a, b, rho, sigma, pinleft, pinright, delta)
            }
        })
        .collect()
}
