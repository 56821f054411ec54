// FASTA reader module using bio::io::fasta
//
// Thin wrapper that adds transparent gzip decompression by file extension,
// so callers can hand in .fa and .fa.gz files alike.

use std::io::{self, BufReader, Read};
use std::path::Path;

use bio::io::fasta;

use crate::utils::xzopen;

/// FASTA reader over plain or gzip-compressed files.
pub struct FastaReader {
    records: fasta::Records<BufReader<Box<dyn Read>>>,
}

impl FastaReader {
    /// Open a FASTA file (`.fa`, `.fasta`, or either with `.gz`).
    pub fn new(path: &Path) -> io::Result<Self> {
        let reader = fasta::Reader::new(xzopen(path)?);
        Ok(FastaReader {
            records: reader.records(),
        })
    }

    /// Read the next FASTA record.
    ///
    /// Returns `Ok(Some(record))` if a record is found, `Ok(None)` at EOF,
    /// and `Err(e)` on a parse error.
    pub fn read_record(&mut self) -> io::Result<Option<fasta::Record>> {
        match self.records.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(io::Error::new(io::ErrorKind::Other, e)),
            None => Ok(None),
        }
    }
}
