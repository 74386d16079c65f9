//! Genome-specific nucleotide background frequencies.

use std::fmt;

/// Nucleotide frequencies in `A, C, G, T` order.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct BackgroundModel {
    frequencies: [f64; 4],
}

const HUMAN_BACKGROUND: [f64; 4] = [
    0.26005923930888059,
    0.23994076069111939,
    0.23994076069111939,
    0.26005923930888059,
];

const MOUSE_BACKGROUND: [f64; 4] = [
    0.29119881438474354,
    0.20880118561525646,
    0.20880118561525646,
    0.29119881438474354,
];

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum GenomeBuild {
    Human,
    Mouse,
    Other,
}

impl GenomeBuild {
    pub fn from_name(build: &str) -> Self {
        match build {
            "hg18" | "hg19" => GenomeBuild::Human,
            "mm8" | "mm9" | "mm10" => GenomeBuild::Mouse,
            _ => GenomeBuild::Other,
        }
    }
}

impl BackgroundModel {
    /// Selects the background for a genome build. Unknown builds get uniform frequencies.
    pub fn select(build: &str) -> Self {
        match GenomeBuild::from_name(build) {
            GenomeBuild::Human => Self::from_frequencies(HUMAN_BACKGROUND),
            GenomeBuild::Mouse => Self::from_frequencies(MOUSE_BACKGROUND),
            GenomeBuild::Other => {
                log::debug!("No background for genome build '{}', using uniform", build);
                Self::uniform()
            }
        }
    }

    pub fn uniform() -> Self {
        Self::from_frequencies([0.25; 4])
    }

    fn from_frequencies(frequencies: [f64; 4]) -> Self {
        Self { frequencies }
    }

    pub fn frequencies(&self) -> &[f64; 4] {
        &self.frequencies
    }

    /// `log2` of each frequency, in `A, C, G, T` order.
    pub fn log2_frequencies(&self) -> [f64; 4] {
        self.frequencies.map(f64::log2)
    }
}

impl Default for BackgroundModel {
    fn default() -> Self {
        Self::uniform()
    }
}

impl fmt::Display for BackgroundModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, c, g, t] = self.frequencies;
        write!(f, "A={:.4} C={:.4} G={:.4} T={:.4}", a, c, g, t)
    }
}
