//! Affine-gap pairwise alignment kernels with CIGAR output.
//!
//! Four Gotoh-style kernels over raw byte sequences — global, local,
//! semi-global with independently pinned ends, and variable-band local —
//! share one cell transition and one traceback encoding. Scores come from a
//! caller-supplied 256x256 substitution matrix (`ScoreMatrix::dna` or
//! `ScoreMatrix::blosum62`); results are `Cigar`s that carry their own
//! query/subject spans and can be rendered, scored, and diffed against the
//! original sequences.

pub mod alignment;
pub mod io;
pub mod utils;

pub use alignment::batch::{align_batch, AlignMode};
pub use alignment::cigar::{Cigar, CigarElement, CigarOp, CigarParseError};
pub use alignment::gotoh::{glb_align, lcl_align, sg_align, var_band_align};
pub use alignment::matrix::ScoreMatrix;
pub use alignment::score::CompoundScore;
