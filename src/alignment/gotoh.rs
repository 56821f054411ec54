//! Affine-gap pairwise alignment kernels over raw byte sequences.
//!
//! Four Gotoh-style kernels share one per-cell transition: global, local
//! (Smith-Waterman), semi-global with independently pinned ends, and a
//! variable-band local kernel restricted per row to a column window. They
//! differ only in boundary initialization, whether nonpositive cells reset,
//! whether the per-row left column extends a B-gap, and where backtrack
//! starts. Score rows are linear in `nb`; the traceback bitmap is the full
//! `(na + 1) x (nb + 1)` byte matrix walked by `back_track`.
//!
//! Gap costs are affine: opening costs `rho`, every base costs `sigma`, so a
//! one-base gap costs `rho + sigma`. An A-gap is a gap in the first sequence
//! (a `D` element, consuming subject only); a B-gap is a gap in the second
//! (an `I` element, consuming query only).

use crate::alignment::cigar::{Cigar, CigarElement, CigarOp};
use crate::alignment::matrix::ScoreMatrix;
use crate::alignment::score::CompoundScore;
use crate::alignment::workspace::AlignScratch;

// Traceback flags. A cell with neither gap bit is a diagonal step. The start
// bits mark where a gap run opens; backtrack follows the run until it sees
// one. Zero halts backtrack.
const AGAP: u8 = 1;
const BGAP: u8 = 2;
const ASTART: u8 = 4;
const BSTART: u8 = 8;
const ZERO: u8 = 16;

/// Per-call scoring constants.
struct KernelConsts {
    /// Open an A-gap.
    rsa: CompoundScore,
    /// Open a B-gap; the tiebreak prefers it over an A-gap on score ties.
    rsb: CompoundScore,
    /// Extend an A-gap.
    exta: CompoundScore,
    /// Extend a B-gap.
    extb: CompoundScore,
    bigneg: CompoundScore,
}

impl KernelConsts {
    fn new(rho: i32, sigma: i32) -> Self {
        assert!(
            rho >= 0 && sigma >= 0,
            "gap penalties must be nonnegative (rho={rho}, sigma={sigma})"
        );
        KernelConsts {
            rsa: CompoundScore::new(-rho - sigma, 0),
            rsb: CompoundScore::new(-rho - sigma, 1),
            exta: CompoundScore::new(-sigma, 0),
            extb: CompoundScore::new(-sigma, 1),
            bigneg: CompoundScore::new(i32::MIN / 2, 0),
        }
    }
}

/// Running maximum over diagonal-winner cells, as a bitmap index.
#[derive(Clone, Copy)]
struct MaxCell {
    score: CompoundScore,
    idx: usize,
}

impl MaxCell {
    fn start() -> Self {
        MaxCell {
            score: CompoundScore::ZERO,
            idx: 0,
        }
    }
}

/// Fill one DP row over columns `jl..=jr` (0-based over `b`), updating the
/// score rows, the per-column B-gap state, the bitmap row at `row_base`, and
/// the running maximum. Ties resolve diagonal first, then by the compound
/// ordering between the two gap states; the maximum only tracks cells won by
/// the diagonal.
#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn fill_row(
    delta_row: &[i8; 256],
    b: &[u8],
    jl: usize,
    jr: usize,
    row_base: usize,
    s: &mut [CompoundScore],
    sm: &[CompoundScore],
    gapb: &mut [CompoundScore],
    bitmap: &mut [u8],
    mut gapa: CompoundScore,
    consts: &KernelConsts,
    reset_nonpositive: bool,
    max: &mut MaxCell,
) {
    for j in jl..=jr {
        let idx = row_base + j + 1;
        let mut flags = 0u8;

        // diagonal extension
        let ss = sm[j] + CompoundScore::new(delta_row[b[j] as usize] as i32, 1);

        gapa += consts.exta;
        if s[j] + consts.rsa > gapa {
            gapa = s[j] + consts.rsa;
            flags |= ASTART;
        }

        gapb[j + 1] += consts.extb;
        if sm[j + 1] + consts.rsb > gapb[j + 1] {
            gapb[j + 1] = sm[j + 1] + consts.rsb;
            flags |= BSTART;
        }
        let gapbj = gapb[j + 1];

        let winner = if gapa > gapbj {
            if ss > gapa {
                if ss > max.score {
                    *max = MaxCell { score: ss, idx };
                }
                ss
            } else {
                flags |= AGAP;
                gapa
            }
        } else if ss > gapbj {
            if ss > max.score {
                *max = MaxCell { score: ss, idx };
            }
            ss
        } else {
            flags |= BGAP;
            gapbj
        };

        s[j + 1] = winner;
        if reset_nonpositive && winner.score() <= 0 {
            s[j + 1] = CompoundScore::ZERO;
            flags |= ZERO;
        }
        bitmap[idx] = flags;
    }
}

/// Walk the bitmap from the cell at `idx` (alignment position `(ia, ib)`)
/// back to a terminator, growing the Cigar from the front. A gap run is
/// followed until its start bit, then one more step crosses the opening
/// cell.
fn back_track(mut ia: i32, mut ib: i32, bitmap: &[u8], mut idx: usize, stride: usize) -> Cigar {
    let mut track = Cigar::new(ia, ib);
    while (ia >= 0 || ib >= 0) && bitmap[idx] & ZERO == 0 {
        if bitmap[idx] & AGAP != 0 {
            let mut len = 1u32;
            while bitmap[idx] & ASTART == 0 {
                len += 1;
                idx -= 1;
            }
            idx -= 1;
            ib -= len as i32;
            track.push_front(CigarElement::new(len, CigarOp::Deletion));
        } else if bitmap[idx] & BGAP != 0 {
            let mut len = 1u32;
            while bitmap[idx] & BSTART == 0 {
                len += 1;
                idx -= stride;
            }
            idx -= stride;
            ia -= len as i32;
            track.push_front(CigarElement::new(len, CigarOp::Insertion));
        } else {
            track.push_front(CigarElement::new(1, CigarOp::Match));
            ia -= 1;
            ib -= 1;
            idx -= stride + 1;
        }
    }
    track
}

/// End-to-end alignment of `a` against `b`.
///
/// `rho` opens a gap and `sigma` extends it; both must be nonnegative. The
/// backtrack always starts at the bottom-right corner, so both sequences are
/// consumed completely (an empty `a` yields one `D` element over all of `b`,
/// and symmetrically for an empty `b`).
pub fn glb_align(a: &[u8], b: &[u8], rho: i32, sigma: i32, delta: &ScoreMatrix) -> Cigar {
    let (na, nb) = (a.len(), b.len());
    let stride = nb + 1;
    let consts = KernelConsts::new(rho, sigma);
    let mut scr = AlignScratch::new(na, nb);

    // Row -1 boundary: the best score for every prefix of `b` is one leading
    // A-gap. Only column 1 carries the start bit; backtrack from (0, j)
    // walks the AGAP cells left to it, encoding a single gap of length j.
    scr.sm[0] = CompoundScore::ZERO;
    if nb > 0 {
        scr.sm[1] = consts.rsa;
        for j in 2..=nb {
            scr.sm[j] = scr.sm[j - 1] + consts.exta;
        }
    }
    scr.s[0] = consts.rsb;
    for g in scr.gapb.iter_mut() {
        *g = consts.bigneg;
    }

    scr.bitmap[0] = 0;
    for j in 1..=nb {
        scr.bitmap[j] = AGAP;
    }
    if nb > 0 {
        scr.bitmap[1] |= ASTART;
    }

    let mut max = MaxCell::start();
    for i in 0..na {
        let row_base = (i + 1) * stride;
        scr.bitmap[row_base] = BSTART | BGAP;
        if nb > 0 {
            fill_row(
                delta.row(a[i]),
                b,
                0,
                nb - 1,
                row_base,
                &mut scr.s,
                &scr.sm,
                &mut scr.gapb,
                &mut scr.bitmap,
                consts.bigneg,
                &consts,
                false,
                &mut max,
            );
        }
        std::mem::swap(&mut scr.s, &mut scr.sm);
        // extend the B-gap down the left column
        scr.s[0] = scr.sm[0] + consts.extb;
    }

    back_track(
        na as i32 - 1,
        nb as i32 - 1,
        &scr.bitmap,
        (na + 1) * stride - 1,
        stride,
    )
}

/// Best-scoring local (Smith-Waterman) alignment of `a` against `b`.
///
/// Nonpositive cells reset to zero and terminate backtrack; the result is
/// the first cell (in row-major order) attaining the maximum score. Two
/// sequences with nothing in common yield an empty Cigar.
pub fn lcl_align(a: &[u8], b: &[u8], rho: i32, sigma: i32, delta: &ScoreMatrix) -> Cigar {
    let (na, nb) = (a.len(), b.len());
    let stride = nb + 1;
    let consts = KernelConsts::new(rho, sigma);
    let mut scr = AlignScratch::new(na, nb);

    // scratch rows start zeroed; only the boundary terminators need marking
    for j in 0..=nb {
        scr.bitmap[j] = ZERO;
    }

    let mut max = MaxCell::start();
    for i in 0..na {
        let row_base = (i + 1) * stride;
        scr.bitmap[row_base] = ZERO;
        if nb > 0 {
            fill_row(
                delta.row(a[i]),
                b,
                0,
                nb - 1,
                row_base,
                &mut scr.s,
                &scr.sm,
                &mut scr.gapb,
                &mut scr.bitmap,
                CompoundScore::ZERO,
                &consts,
                true,
                &mut max,
            );
        }
        std::mem::swap(&mut scr.s, &mut scr.sm);
    }

    let ia = (max.idx / stride) as i32 - 1;
    let ib = (max.idx % stride) as i32 - 1;
    back_track(ia, ib, &scr.bitmap, max.idx, stride)
}

/// Semi-global alignment with independently pinned ends.
///
/// `pinleft` forces the alignment to start at the beginning of both
/// sequences (global-style boundaries, no cell reset); `pinright` forces it
/// to end at both ends (backtrack from the bottom-right corner instead of
/// the maximum). With neither end pinned this behaves like the local
/// kernel; with both it is an end-to-end alignment.
pub fn sg_align(
    a: &[u8],
    b: &[u8],
    rho: i32,
    sigma: i32,
    pinleft: bool,
    pinright: bool,
    delta: &ScoreMatrix,
) -> Cigar {
    let (na, nb) = (a.len(), b.len());
    let stride = nb + 1;
    let consts = KernelConsts::new(rho, sigma);
    let mut scr = AlignScratch::new(na, nb);

    scr.gapb[0] = consts.bigneg; // not used
    if pinleft {
        if nb > 0 {
            scr.sm[1] = consts.rsa;
            scr.bitmap[1] = ASTART | AGAP;
            scr.gapb[1] = consts.bigneg;
            for j in 2..=nb {
                scr.sm[j] = scr.sm[j - 1] + consts.exta;
                scr.bitmap[j] = AGAP;
                scr.gapb[j] = consts.bigneg;
            }
        }
        scr.s[0] = consts.rsb;
    } else {
        for j in 1..=nb {
            scr.bitmap[j] = ZERO;
            scr.gapb[j] = consts.bigneg;
        }
    }

    let mut max = MaxCell::start();
    for i in 0..na {
        let row_base = (i + 1) * stride;
        scr.bitmap[row_base] = if pinleft { BSTART | BGAP } else { ZERO };
        if nb > 0 {
            fill_row(
                delta.row(a[i]),
                b,
                0,
                nb - 1,
                row_base,
                &mut scr.s,
                &scr.sm,
                &mut scr.gapb,
                &mut scr.bitmap,
                consts.bigneg,
                &consts,
                !pinleft,
                &mut max,
            );
        }
        std::mem::swap(&mut scr.s, &mut scr.sm);
        if pinleft {
            scr.s[0] = scr.sm[0] + consts.extb;
        }
    }

    if pinright {
        back_track(
            na as i32 - 1,
            nb as i32 - 1,
            &scr.bitmap,
            (na + 1) * stride - 1,
            stride,
        )
    } else {
        let ia = (max.idx / stride) as i32 - 1;
        let ib = (max.idx % stride) as i32 - 1;
        back_track(ia, ib, &scr.bitmap, max.idx, stride)
    }
}

/// Local alignment restricted, for each row of `a`, to the inclusive column
/// window `blimits[i] = (left, right)` of `b`.
///
/// Windows need not overlap between rows; scratch cells exposed by widening
/// or vacated by narrowing are cleared so later rows cannot see stale state,
/// and backtrack never crosses an empty row. A row with `left > right`
/// contributes nothing.
pub fn var_band_align(
    a: &[u8],
    b: &[u8],
    rho: i32,
    sigma: i32,
    delta: &ScoreMatrix,
    blimits: &[(i32, i32)],
) -> Cigar {
    let (na, nb) = (a.len(), b.len());
    assert_eq!(blimits.len(), na, "one band window per row of `a`");
    for (i, &(bleft, bright)) in blimits.iter().enumerate() {
        assert!(
            bleft >= 0 && bleft <= nb as i32 && bright < nb as i32,
            "band window ({bleft}, {bright}) out of range at row {i}"
        );
    }
    let consts = KernelConsts::new(rho, sigma);
    if na == 0 || nb == 0 {
        return Cigar::new(-1, -1);
    }
    let stride = nb + 1;
    let mut scr = AlignScratch::new(na, nb);

    for j in 0..=nb {
        scr.bitmap[j] = ZERO;
    }

    let mut max = MaxCell::start();
    for i in 0..na {
        let (bleft, bright) = blimits[i];
        let row_base = (i + 1) * stride;
        scr.bitmap[row_base + bleft as usize] = ZERO;
        scr.s[bleft as usize] = CompoundScore::ZERO;
        if bleft <= bright {
            fill_row(
                delta.row(a[i]),
                b,
                bleft as usize,
                bright as usize,
                row_base,
                &mut scr.s,
                &scr.sm,
                &mut scr.gapb,
                &mut scr.bitmap,
                CompoundScore::ZERO,
                &consts,
                true,
                &mut max,
            );
        }
        if i + 1 == na {
            break;
        }
        std::mem::swap(&mut scr.s, &mut scr.sm);

        // Reconcile scratch with the next row's window: cells the window
        // grows over start from zero, cells it left behind are cleared so a
        // later widening cannot pick up stale state.
        let (nextl, nextr) = blimits[i + 1];
        for l in (bright + 1).max(0)..=nextr {
            scr.bitmap[row_base + l as usize + 1] = ZERO;
        }
        for l in (nextr + 1).max(0)..=bright {
            scr.gapb[l as usize + 1] = CompoundScore::ZERO;
            scr.sm[l as usize + 1] = CompoundScore::ZERO;
        }
        for l in (nextl - 1)..=(bleft - 1) {
            let col = (l + 1) as usize;
            scr.gapb[col] = CompoundScore::ZERO;
            scr.sm[col] = CompoundScore::ZERO;
            scr.bitmap[row_base + col] = ZERO;
        }
    }

    let ia = (max.idx / stride) as i32 - 1;
    let ib = (max.idx % stride) as i32 - 1;
    back_track(ia, ib, &scr.bitmap, max.idx, stride)
}
