//! Small shared helpers: sequence entropy and gzip-aware file opening.

use std::fs::OpenOptions;
use std::io::{self, stdin, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

/// Shannon entropy of a DNA string in base 4: near 0 for homopolymers, near
/// 1 for a uniform base composition. Bytes other than `A`, `C`, `G`, `T`
/// are ignored; tiny pseudocounts keep `log(0)` out of the sum.
pub fn entropy(seq: &[u8]) -> f64 {
    let length = seq.len();
    if length == 0 {
        return 0.0;
    }
    let mut ta = 1.0e-8;
    let mut tc = 1.0e-8;
    let mut tg = 1.0e-8;
    let mut tt = 1.0e-8;
    for &c in seq {
        match c {
            b'A' => ta += 1.0,
            b'C' => tc += 1.0,
            b'G' => tg += 1.0,
            b'T' => tt += 1.0,
            _ => {}
        }
    }
    let len = length as f64;
    -(ta * (ta / len).ln() + tc * (tc / len).ln() + tg * (tg / len).ln() + tt * (tt / len).ln())
        / (len * 4f64.ln())
}

/// Open a file for buffered reading; `-` reads stdin.
pub fn xopen(path: &Path) -> io::Result<Box<dyn Read>> {
    if path.to_str() == Some("-") {
        return Ok(Box::new(BufReader::new(stdin())));
    }
    let file = OpenOptions::new().read(true).open(path)?;
    Ok(Box::new(BufReader::new(file)))
}

/// Like `xopen`, transparently decompressing `.gz` files.
pub fn xzopen(path: &Path) -> io::Result<Box<dyn Read>> {
    let input = xopen(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(input)))
    } else {
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::entropy;

    #[test]
    fn entropy_of_empty_is_zero() {
        assert_eq!(entropy(b""), 0.0);
    }

    #[test]
    fn entropy_of_homopolymer_is_near_zero() {
        let e = entropy(b"AAAAAAAAAA");
        assert!(e.abs() < 1e-6, "expected ~0, got {e}");
    }

    #[test]
    fn entropy_of_uniform_composition_is_near_one() {
        let e = entropy(b"ACGTACGTACGTACGT");
        assert!((e - 1.0).abs() < 1e-6, "expected ~1, got {e}");
    }

    #[test]
    fn entropy_ignores_other_bytes() {
        // the non-ACGT bytes still count toward the length
        let with_ns = entropy(b"ACGTNNNN");
        let plain = entropy(b"ACGT");
        assert!(with_ns < plain);
    }

    #[test]
    fn entropy_of_two_letter_alphabet_is_half() {
        let e = entropy(b"ACACACACACACACAC");
        assert!((e - 0.5).abs() < 1e-6, "expected ~0.5, got {e}");
    }
}
