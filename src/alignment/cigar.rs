//! CIGAR representation of a pairwise alignment.
//!
//! A `Cigar` is the run-length encoded operation list together with the
//! 0-based inclusive span it covers on the query (first sequence) and the
//! subject (second sequence). The backtracker grows it front-first; adjacent
//! elements of the same kind are merged on insertion, so no two neighbors
//! ever share a kind.

use std::collections::VecDeque;
use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::alignment::matrix::ScoreMatrix;

/// Alignment operation kind with zero-cost conversion to/from bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CigarOp {
    /// Match or mismatch: consumes one query and one subject base.
    Match = b'M',
    /// Gap in the subject: consumes query bases only.
    Insertion = b'I',
    /// Gap in the query: consumes subject bases only.
    Deletion = b'D',
}

impl CigarOp {
    #[inline(always)]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'M' => Some(Self::Match),
            b'I' => Some(Self::Insertion),
            b'D' => Some(Self::Deletion),
            _ => None,
        }
    }

    /// Returns true if this operation consumes query bases.
    #[inline(always)]
    pub const fn consumes_query(self) -> bool {
        matches!(self, Self::Match | Self::Insertion)
    }

    /// Returns true if this operation consumes subject bases.
    #[inline(always)]
    pub const fn consumes_subject(self) -> bool {
        matches!(self, Self::Match | Self::Deletion)
    }
}

/// One run of identical operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarElement {
    pub len: u32,
    pub op: CigarOp,
}

impl CigarElement {
    #[inline(always)]
    pub const fn new(len: u32, op: CigarOp) -> Self {
        CigarElement { len, op }
    }
}

/// Run-length encoded alignment with its coordinate span.
#[derive(Clone, PartialEq, Eq)]
pub struct Cigar {
    elements: VecDeque<CigarElement>,
    qfrom: i32,
    qto: i32,
    sfrom: i32,
    sto: i32,
}

impl Cigar {
    /// An empty alignment anchored just past `(ia, ib)`: `push_front` grows
    /// it toward smaller coordinates, `push_back` toward larger.
    pub fn new(ia: i32, ib: i32) -> Self {
        Cigar {
            elements: VecDeque::new(),
            qfrom: ia + 1,
            qto: ia,
            sfrom: ib + 1,
            sto: ib,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &CigarElement> {
        self.elements.iter()
    }

    /// 0-based inclusive query span `(qfrom, qto)`.
    pub fn query_range(&self) -> (i32, i32) {
        (self.qfrom, self.qto)
    }

    /// 0-based inclusive subject span `(sfrom, sto)`.
    pub fn subject_range(&self) -> (i32, i32) {
        (self.sfrom, self.sto)
    }

    pub fn push_front(&mut self, el: CigarElement) {
        if el.len == 0 {
            return;
        }
        if el.op.consumes_query() {
            self.qfrom -= el.len as i32;
        }
        if el.op.consumes_subject() {
            self.sfrom -= el.len as i32;
        }
        match self.elements.front_mut() {
            Some(front) if front.op == el.op => front.len += el.len,
            _ => self.elements.push_front(el),
        }
    }

    pub fn push_back(&mut self, el: CigarElement) {
        if el.len == 0 {
            return;
        }
        if el.op.consumes_query() {
            self.qto += el.len as i32;
        }
        if el.op.consumes_subject() {
            self.sto += el.len as i32;
        }
        match self.elements.back_mut() {
            Some(back) if back.op == el.op => back.len += el.len,
            _ => self.elements.push_back(el),
        }
    }

    /// Compact `{len}{op}` string with terminal soft clips covering the
    /// untrimmed parts of the query. `qstart` and `qlen` are in query
    /// coordinates; clip lengths clamp at zero.
    pub fn cigar_string(&self, qstart: i32, qlen: i32) -> String {
        let mut cigar = String::new();
        for el in &self.elements {
            write!(cigar, "{}{}", el.len, el.op.to_byte() as char).unwrap();
        }

        let missing_start = qstart + self.qfrom;
        if missing_start > 0 {
            cigar = format!("{missing_start}S{cigar}");
        }
        let missing_end = qlen - 1 - self.qto - qstart;
        if missing_end > 0 {
            write!(cigar, "{missing_end}S").unwrap();
        }

        cigar
    }

    /// Like `cigar_string` but each `M` run is split into alternating `=`
    /// (match) and `X` (mismatch) runs against the actual sequences.
    pub fn detailed_cigar_string(
        &self,
        qstart: i32,
        qlen: i32,
        query: &[u8],
        subject: &[u8],
    ) -> String {
        let mut cigar = String::new();
        let mut q = self.qfrom as usize;
        let mut s = self.sfrom as usize;
        for el in &self.elements {
            match el.op {
                CigarOp::Match => {
                    let mut is_match = query[q] == subject[s];
                    let mut len = 0u32;
                    for _ in 0..el.len {
                        if (query[q] == subject[s]) == is_match {
                            len += 1;
                        } else {
                            write!(cigar, "{}{}", len, if is_match { '=' } else { 'X' }).unwrap();
                            is_match = !is_match;
                            len = 1;
                        }
                        q += 1;
                        s += 1;
                    }
                    write!(cigar, "{}{}", len, if is_match { '=' } else { 'X' }).unwrap();
                }
                CigarOp::Deletion => {
                    write!(cigar, "{}D", el.len).unwrap();
                    s += el.len as usize;
                }
                CigarOp::Insertion => {
                    write!(cigar, "{}I", el.len).unwrap();
                    q += el.len as usize;
                }
            }
        }

        let missing_start = qstart + self.qfrom;
        if missing_start > 0 {
            cigar = format!("{missing_start}S{cigar}");
        }
        let missing_end = qlen - 1 - self.qto - qstart;
        if missing_end > 0 {
            write!(cigar, "{missing_end}S").unwrap();
        }

        cigar
    }

    /// Render both sequences over the alignment, gaps written as `-`.
    /// The returned strings have equal length.
    pub fn to_align(&self, query: &[u8], subject: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let mut first = Vec::new();
        let mut second = Vec::new();
        let mut q = self.qfrom as usize;
        let mut s = self.sfrom as usize;
        for el in &self.elements {
            let len = el.len as usize;
            match el.op {
                CigarOp::Match => {
                    first.extend_from_slice(&query[q..q + len]);
                    second.extend_from_slice(&subject[s..s + len]);
                    q += len;
                    s += len;
                }
                CigarOp::Deletion => {
                    first.extend(std::iter::repeat(b'-').take(len));
                    second.extend_from_slice(&subject[s..s + len]);
                    s += len;
                }
                CigarOp::Insertion => {
                    first.extend_from_slice(&query[q..q + len]);
                    second.extend(std::iter::repeat(b'-').take(len));
                    q += len;
                }
            }
        }
        (first, second)
    }

    /// Number of positions inside `M` runs where the bases agree.
    pub fn matches(&self, query: &[u8], subject: &[u8]) -> usize {
        let mut matches = 0;
        let mut q = self.qfrom as usize;
        let mut s = self.sfrom as usize;
        for el in &self.elements {
            let len = el.len as usize;
            match el.op {
                CigarOp::Match => {
                    for l in 0..len {
                        if query[q + l] == subject[s + l] {
                            matches += 1;
                        }
                    }
                    q += len;
                    s += len;
                }
                CigarOp::Deletion => s += len,
                CigarOp::Insertion => q += len,
            }
        }
        matches
    }

    /// Edit distance over the aligned span: mismatches inside `M` runs plus
    /// every gap position.
    pub fn distance(&self, query: &[u8], subject: &[u8]) -> usize {
        let mut dist = 0;
        let mut q = self.qfrom as usize;
        let mut s = self.sfrom as usize;
        for el in &self.elements {
            let len = el.len as usize;
            match el.op {
                CigarOp::Match => {
                    for l in 0..len {
                        if query[q + l] != subject[s + l] {
                            dist += 1;
                        }
                    }
                    q += len;
                    s += len;
                }
                CigarOp::Deletion => {
                    s += len;
                    dist += len;
                }
                CigarOp::Insertion => {
                    q += len;
                    dist += len;
                }
            }
        }
        dist
    }

    /// Alignment score under `delta` with affine gap costs: each gap element
    /// of length `len` costs `rho + sigma * len`.
    pub fn score(
        &self,
        query: &[u8],
        subject: &[u8],
        rho: i32,
        sigma: i32,
        delta: &ScoreMatrix,
    ) -> i32 {
        let mut score = 0;
        let mut q = self.qfrom as usize;
        let mut s = self.sfrom as usize;
        for el in &self.elements {
            let len = el.len as usize;
            match el.op {
                CigarOp::Match => {
                    for l in 0..len {
                        score += delta.score(query[q + l], subject[s + l]);
                    }
                    q += len;
                    s += len;
                }
                CigarOp::Deletion => {
                    s += len;
                    score -= rho + sigma * el.len as i32;
                }
                CigarOp::Insertion => {
                    q += len;
                    score -= rho + sigma * el.len as i32;
                }
            }
        }
        score
    }
}

impl Display for Cigar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for el in &self.elements {
            write!(f, "{}{}", el.len, el.op.to_byte() as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Cigar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cigar({} q{}..{} s{}..{})",
            self, self.qfrom, self.qto, self.sfrom, self.sto
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CigarParseError {
    #[error("invalid CIGAR operation {0:?}")]
    InvalidOp(char),
    #[error("operation {0:?} has no length")]
    MissingLength(char),
    #[error("trailing length with no operation")]
    TrailingLength,
}

impl FromStr for Cigar {
    type Err = CigarParseError;

    /// Parses `([0-9]+[MID])*`, anchored at the origin. Clips are a rendering
    /// concern and are not accepted here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cigar = Cigar::new(-1, -1);
        let mut number: Option<u32> = None;
        for ch in s.chars() {
            if let Some(d) = ch.to_digit(10) {
                number = Some(number.unwrap_or(0) * 10 + d);
            } else {
                let op = u8::try_from(ch)
                    .ok()
                    .and_then(CigarOp::from_byte)
                    .ok_or(CigarParseError::InvalidOp(ch))?;
                let len = number.take().ok_or(CigarParseError::MissingLength(ch))?;
                cigar.push_back(CigarElement::new(len, op));
            }
        }
        if number.is_some() {
            return Err(CigarParseError::TrailingLength);
        }
        Ok(cigar)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cigar, CigarElement, CigarOp, CigarParseError};

    #[test]
    fn fresh_cigar_is_an_empty_span() {
        let cigar = Cigar::new(3, 5);
        assert!(cigar.is_empty());
        assert_eq!(cigar.query_range(), (4, 3));
        assert_eq!(cigar.subject_range(), (6, 5));
    }

    #[test]
    fn push_front_extends_coordinates() {
        let mut cigar = Cigar::new(4, 4);
        cigar.push_front(CigarElement::new(2, CigarOp::Match));
        assert_eq!(cigar.query_range(), (3, 4));
        assert_eq!(cigar.subject_range(), (3, 4));

        cigar.push_front(CigarElement::new(1, CigarOp::Deletion));
        assert_eq!(cigar.query_range(), (3, 4));
        assert_eq!(cigar.subject_range(), (2, 4));

        cigar.push_front(CigarElement::new(1, CigarOp::Insertion));
        assert_eq!(cigar.query_range(), (2, 4));
        assert_eq!(cigar.subject_range(), (2, 4));
        assert_eq!(cigar.to_string(), "1I1D2M");
    }

    #[test]
    fn pushes_merge_same_kind() {
        let mut cigar = Cigar::new(-1, -1);
        cigar.push_back(CigarElement::new(1, CigarOp::Match));
        cigar.push_back(CigarElement::new(2, CigarOp::Match));
        cigar.push_back(CigarElement::new(1, CigarOp::Insertion));
        cigar.push_front(CigarElement::new(3, CigarOp::Match));
        assert_eq!(cigar.to_string(), "6M1I");
        assert_eq!(cigar.elements().count(), 2);
        assert_eq!(cigar.query_range(), (-3, 3));
        assert_eq!(cigar.subject_range(), (-3, 2));
    }

    #[test]
    fn zero_length_push_is_a_no_op() {
        let mut cigar = Cigar::new(0, 0);
        cigar.push_back(CigarElement::new(0, CigarOp::Match));
        assert!(cigar.is_empty());
        assert_eq!(cigar.query_range(), (1, 0));
    }

    #[test]
    fn parse_round_trip() {
        let cigar: Cigar = "10M2I1D99M".parse().unwrap();
        assert_eq!(cigar.to_string(), "10M2I1D99M");
        assert_eq!(cigar.query_range(), (0, 110));
        assert_eq!(cigar.subject_range(), (0, 109));

        assert!("".parse::<Cigar>().unwrap().is_empty());
        // adjacent runs of one kind merge on construction
        assert_eq!("1M2M".parse::<Cigar>().unwrap().to_string(), "3M");
    }

    #[test]
    fn parse_errors() {
        assert_eq!("3Q".parse::<Cigar>(), Err(CigarParseError::InvalidOp('Q')));
        assert_eq!(
            "M".parse::<Cigar>(),
            Err(CigarParseError::MissingLength('M'))
        );
        assert_eq!("12".parse::<Cigar>(), Err(CigarParseError::TrailingLength));
    }
}
