use crate::affinity::background::BackgroundModel;
use crate::utils::Result;

/// Index of an upper-case nucleotide in `A, C, G, T` order.
#[inline]
pub fn nucleotide_index(base: u8) -> Option<usize> {
    match base {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// A named position-specific scoring matrix.
#[derive(Debug, PartialEq, Clone)]
pub struct Motif {
    pub name: String,
    pub source: Option<String>,
    /// Log-odds weights per position, in `A, C, G, T` order.
    weights: Vec<[f64; 4]>,
    min_score: f64,
    max_score: f64,
}

impl Motif {
    pub fn new(name: impl Into<String>, weights: Vec<[f64; 4]>) -> Result<Self> {
        let name = name.into();
        if weights.is_empty() {
            return Err(format!("Motif '{}' has no positions", name));
        }
        if let Some(pos) = weights
            .iter()
            .position(|row| row.iter().any(|w| !w.is_finite()))
        {
            return Err(format!(
                "Motif '{}' has a non-finite weight at position {}",
                name, pos
            ));
        }

        let (min_score, max_score) = score_bounds(&weights);
        Ok(Self {
            name,
            source: None,
            weights,
            min_score,
            max_score,
        })
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn width(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[[f64; 4]] {
        &self.weights
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn score_range(&self) -> f64 {
        self.max_score - self.min_score
    }

    /// Absolute score corresponding to a fraction of the score range.
    pub fn threshold_score(&self, fraction: f64) -> f64 {
        fraction * self.score_range() + self.min_score
    }

    /// Returns a new motif with `log2(background)` subtracted from every weight.
    pub fn adjust(&self, background: &BackgroundModel) -> Motif {
        let log_bg = background.log2_frequencies();
        let weights: Vec<[f64; 4]> = self
            .weights
            .iter()
            .map(|row| std::array::from_fn(|i| row[i] - log_bg[i]))
            .collect();
        let (min_score, max_score) = score_bounds(&weights);
        Motif {
            name: self.name.clone(),
            source: self.source.clone(),
            weights,
            min_score,
            max_score,
        }
    }

    /// Scores a window of nucleotide indices. The window must be `width()` long.
    #[inline]
    pub fn score_indices(&self, window: &[u8]) -> f64 {
        self.weights
            .iter()
            .zip(window)
            .map(|(row, &idx)| row[idx as usize])
            .sum()
    }
}

fn score_bounds(weights: &[[f64; 4]]) -> (f64, f64) {
    weights.iter().fold((0.0, 0.0), |(lo, hi), row| {
        let row_min = row.iter().copied().fold(f64::INFINITY, f64::min);
        let row_max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lo + row_min, hi + row_max)
    })
}
