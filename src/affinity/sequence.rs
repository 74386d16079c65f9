use crate::utils::{open_input_reader, with_path_context, Result};
use bio::io::fasta;
use std::{io::BufRead, path::Path};

/// A region sequence keyed by its full FASTA header.
#[derive(Debug, PartialEq, Clone)]
pub struct Sequence {
    pub key: String,
    pub residues: Vec<u8>,
}

impl Sequence {
    pub fn new(key: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            residues: residues.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

pub fn load_sequences(path: &Path) -> Result<Vec<Sequence>> {
    let reader = open_input_reader(path)?;
    with_path_context(read_sequences(reader), path)
}

/// Reads FASTA records in file order. Records without residues are kept and
/// score 0 in every row.
pub fn read_sequences<R: BufRead>(reader: R) -> Result<Vec<Sequence>> {
    let sequences = fasta::Reader::from_bufread(reader)
        .records()
        .enumerate()
        .map(|(record_number, record)| {
            let record = record
                .map_err(|e| format!("Error at FASTA record {}: {}", record_number + 1, e))?;
            let key = match record.desc() {
                Some(desc) => format!("{} {}", record.id(), desc),
                None => record.id().to_string(),
            };
            Ok(Sequence::new(key, record.seq()))
        })
        .collect::<Result<Vec<_>>>()?;

    let n_empty = sequences.iter().filter(|s| s.is_empty()).count();
    if n_empty > 0 {
        log::warn!("{} FASTA records have no residues", n_empty);
    }
    Ok(sequences)
}
