// Integration tests for Cigar rendering, trimming, and scoring.

use gotoh_align::{glb_align, lcl_align, Cigar, ScoreMatrix};

fn dna() -> ScoreMatrix {
    ScoreMatrix::dna(1, 2)
}

#[test]
fn to_align_writes_gaps_as_dashes() {
    let (a, b) = (b"ACGT".as_ref(), b"AGT".as_ref());
    let cigar = glb_align(a, b, 3, 1, &dna());
    let (top, bottom) = cigar.to_align(a, b);
    assert_eq!(top, b"ACGT");
    assert_eq!(bottom, b"A-GT");
    assert_eq!(top.len(), bottom.len());
}

#[test]
fn to_align_covers_only_the_local_span() {
    let (a, b) = (b"AAACCCGGG".as_ref(), b"CCC".as_ref());
    let cigar = lcl_align(a, b, 3, 1, &dna());
    let (top, bottom) = cigar.to_align(a, b);
    assert_eq!(top, b"CCC");
    assert_eq!(bottom, b"CCC");
}

#[test]
fn detailed_string_carries_soft_clips() {
    let (a, b) = (b"AAACCCGGG".as_ref(), b"CCC".as_ref());
    let cigar = lcl_align(a, b, 3, 1, &dna());
    assert_eq!(cigar.detailed_cigar_string(0, 9, a, b), "3S3=3S");
}

#[test]
fn query_trimming_shifts_soft_clips() {
    // local 3M at query 3..5 of a 9-base query
    let (a, b) = (b"AAACCCGGG".as_ref(), b"CCC".as_ref());
    let cigar = lcl_align(a, b, 3, 1, &dna());

    // the query is itself a window at offset 2 of an 11-base read
    assert_eq!(cigar.cigar_string(2, 11), "5S3M3S");

    // trimming from the left eats into the leading clip, which clamps at
    // zero while the trailing clip keeps growing
    assert_eq!(cigar.cigar_string(-3, 9), "3M6S");
    assert_eq!(cigar.cigar_string(-5, 9), "3M8S");
}

#[test]
fn parsed_cigar_scores_against_sequences() {
    let cigar: Cigar = "2M1D3M".parse().unwrap();
    let (q, s) = (b"ACGTT".as_ref(), b"ACAGTT".as_ref());
    assert_eq!(cigar.query_range(), (0, 4));
    assert_eq!(cigar.subject_range(), (0, 5));
    assert_eq!(cigar.matches(q, s), 5);
    assert_eq!(cigar.distance(q, s), 1);
    assert_eq!(cigar.score(q, s, 3, 1, &dna()), 1);

    let (top, bottom) = cigar.to_align(q, s);
    assert_eq!(top, b"AC-GTT");
    assert_eq!(bottom, b"ACAGTT");
}

#[test]
fn empty_cigar_renders_clips_only() {
    let cigar = lcl_align(b"AAAA", b"TTTT", 3, 1, &dna());
    assert!(cigar.is_empty());
    assert_eq!(cigar.to_string(), "");
    assert_eq!(cigar.cigar_string(0, 4), "4S");
    assert_eq!(cigar.cigar_string(0, 0), "");
}

#[test]
fn distance_counts_mismatches_and_gaps() {
    let (a, b) = (b"ACGT".as_ref(), b"AGGT".as_ref());
    let cigar = glb_align(a, b, 3, 1, &dna());
    assert_eq!(cigar.matches(a, b), 3);
    assert_eq!(cigar.distance(a, b), 1);

    let (a, b) = (b"ACGT".as_ref(), b"AGT".as_ref());
    let cigar = glb_align(a, b, 3, 1, &dna());
    assert_eq!(cigar.matches(a, b), 3);
    assert_eq!(cigar.distance(a, b), 1);
}
