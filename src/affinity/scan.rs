//! Forward-strand PSSM scanning.
//!
//! Only the forward strand is scanned; the reverse complement is never tried.

use crate::affinity::motif::{nucleotide_index, Motif};
use std::fmt;

const AMBIGUOUS: u8 = u8::MAX;

/// Reasons a single sequence could not be scanned.
#[derive(Debug, PartialEq, Clone)]
pub enum ScanError {
    InvalidResidue { position: usize, residue: u8 },
    NonFiniteScore { position: usize },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InvalidResidue { position, residue } => write!(
                f,
                "invalid residue '{}' at position {}",
                residue.escape_ascii(),
                position
            ),
            ScanError::NonFiniteScore { position } => {
                write!(f, "non-finite window score at position {}", position)
            }
        }
    }
}

/// Encodes a sequence to nucleotide indices after upper-casing.
/// `N` is kept as an ambiguity marker; anything else outside `ACGT` is an error.
fn encode(residues: &[u8]) -> Result<Vec<u8>, ScanError> {
    residues
        .iter()
        .enumerate()
        .map(|(position, &residue)| {
            let upper = residue.to_ascii_uppercase();
            match nucleotide_index(upper) {
                Some(idx) => Ok(idx as u8),
                None if upper == b'N' => Ok(AMBIGUOUS),
                None => Err(ScanError::InvalidResidue { position, residue }),
            }
        })
        .collect()
}

/// Visits the score of every fully-scorable window of the forward strand.
fn for_each_window<F>(motif: &Motif, residues: &[u8], mut visit: F) -> Result<(), ScanError>
where
    F: FnMut(f64),
{
    let encoded = encode(residues)?;
    let width = motif.width();
    if encoded.len() < width {
        return Ok(());
    }

    for (start, window) in encoded.windows(width).enumerate() {
        if window.contains(&AMBIGUOUS) {
            continue;
        }
        let score = motif.score_indices(window);
        if !score.is_finite() {
            return Err(ScanError::NonFiniteScore { position: start });
        }
        visit(score);
    }
    Ok(())
}

/// Raw scores of all windows scoring at or above `threshold_score`.
pub fn scan(motif: &Motif, residues: &[u8], threshold_score: f64) -> Result<Vec<f64>, ScanError> {
    let mut scores = Vec::new();
    for_each_window(motif, residues, |score| {
        if score >= threshold_score {
            scores.push(score);
        }
    })?;
    Ok(scores)
}

/// Highest window score, or `None` when the sequence has no scorable window.
pub fn best_score(motif: &Motif, residues: &[u8]) -> Result<Option<f64>, ScanError> {
    let mut best: Option<f64> = None;
    for_each_window(motif, residues, |score| {
        best = Some(best.map_or(score, |b| b.max(score)));
    })?;
    Ok(best)
}
