//! Defines the `FastaWriter` struct for writing a reduced sequence set.
//!

use crate::affinity::sequence::Sequence;
use crate::utils::{create_writer, finish_writer, OutputSink, Result};
use bio::io::fasta;
use std::{
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

pub struct FastaWriter {
    writer: BufWriter<OutputSink>,
    path: PathBuf,
}

impl FastaWriter {
    pub fn new(output_path: &Path) -> Result<FastaWriter> {
        Ok(FastaWriter {
            writer: create_writer(output_path)?,
            path: output_path.to_path_buf(),
        })
    }

    /// Writes each sequence as a single-line record headed by its full key.
    pub fn write_all(&mut self, sequences: &[Sequence]) -> Result<()> {
        let write_error = |e: io::Error| format!("Failed to write {}: {}", self.path.display(), e);
        let mut records = fasta::Writer::new(&mut self.writer);
        for sequence in sequences {
            records
                .write(&sequence.key, None, &sequence.residues)
                .map_err(write_error)?;
        }
        records.flush().map_err(write_error)
    }

    pub fn finish(self) -> Result<()> {
        finish_writer(self.writer, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affinity::sequence::load_sequences;

    #[test]
    fn test_written_records_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reduced.fsa.gz");
        let sequences = vec![
            Sequence::new("chr1:100-200 peak_1", "ACGTNacgt"),
            Sequence::new("mm9_chr2_10_20_+", "TTGCA"),
        ];

        let mut writer = FastaWriter::new(&path).unwrap();
        writer.write_all(&sequences).unwrap();
        writer.finish().unwrap();

        assert_eq!(load_sequences(&path).unwrap(), sequences);
    }
}
