//! Defines the `MatrixWriter` struct for persisting a motif-by-sequence score matrix.
//!

use crate::affinity::matrix::ScoreMatrix;
use crate::utils::{create_writer, finish_writer, OutputSink, Result};
use itertools::Itertools;
use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Structure for writing score matrices as whitespace-delimited text.
pub struct MatrixWriter {
    /// Buffered output, gzip-compressed for `.gz` paths.
    writer: BufWriter<OutputSink>,
    /// Destination path, used in error messages.
    path: PathBuf,
}

impl MatrixWriter {
    /// Constructs a new `MatrixWriter` instance.
    ///
    /// # Arguments
    /// * `output_path` - Path of the matrix file; an existing file is truncated.
    ///
    /// # Returns
    /// Returns a `Result` with either a new `MatrixWriter` instance or an error message.
    pub fn new(output_path: &Path) -> Result<MatrixWriter> {
        Ok(MatrixWriter {
            writer: create_writer(output_path)?,
            path: output_path.to_path_buf(),
        })
    }

    /// Writes one line per motif row with every cell formatted to 3 decimal places.
    ///
    /// # Arguments
    /// * `matrix` - Score matrix whose row order is the motif library order.
    pub fn write(&mut self, matrix: &ScoreMatrix) -> Result<()> {
        for row in matrix.rows() {
            let line = MatrixWriter::format_row(row);
            writeln!(self.writer, "{}", line)
                .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))?;
        }
        Ok(())
    }

    /// Flushes buffered output and completes the file; must be called before the writer is dropped.
    pub fn finish(self) -> Result<()> {
        finish_writer(self.writer, &self.path)
    }

    fn format_row(row: &[f64]) -> String {
        row.iter().map(|value| format!("{:.3}", value)).join(" ")
    }
}
