use crate::utils::Result;

/// Motif-by-sequence scores; row `i` belongs to motif `i` of the library.
#[derive(Debug, PartialEq, Clone)]
pub struct ScoreMatrix {
    rows: Vec<Vec<f64>>,
    n_cols: usize,
}

impl ScoreMatrix {
    pub fn new(rows: Vec<Vec<f64>>, n_cols: usize) -> Result<Self> {
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(format!(
                "Row {} has {} values, expected {}",
                index,
                row.len(),
                n_cols
            ));
        }
        Ok(Self { rows, n_cols })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }
}
