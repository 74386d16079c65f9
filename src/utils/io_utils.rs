use crate::utils::{is_gzipped, Result};
use flate2::{write::GzEncoder, Compression};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Destination file, gzip-compressed or plain.
pub enum OutputSink {
    Plain(File),
    Gzip(GzEncoder<File>),
}

impl OutputSink {
    /// Flushes the file, writing the gzip trailer for compressed output.
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputSink::Plain(mut file) => file.flush(),
            OutputSink::Gzip(encoder) => encoder.finish().map(|_| ()),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Plain(file) => file.write(buf),
            OutputSink::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Plain(file) => file.flush(),
            OutputSink::Gzip(encoder) => encoder.flush(),
        }
    }
}

/// Creates a buffered output, gzip-compressed when the path ends in `.gz`.
pub fn create_writer(output_path: &Path) -> Result<BufWriter<OutputSink>> {
    let file = File::create(output_path)
        .map_err(|e| format!("Failed to create {}: {}", output_path.display(), e))?;
    let sink = if is_gzipped(output_path) {
        OutputSink::Gzip(GzEncoder::new(file, Compression::default()))
    } else {
        OutputSink::Plain(file)
    };
    Ok(BufWriter::new(sink))
}

/// Flushes a writer from [`create_writer`] and finalizes the underlying file.
pub fn finish_writer(writer: BufWriter<OutputSink>, output_path: &Path) -> Result<()> {
    writer
        .into_inner()
        .map_err(|e| format!("Failed to flush {}: {}", output_path.display(), e))?
        .finish()
        .map_err(|e| format!("Failed to finish {}: {}", output_path.display(), e))
}

/// Path of the reduced sequence file written next to a proximity table.
pub fn derived_fasta_path(gene_file: &Path) -> PathBuf {
    gene_file.with_extension("fsa")
}
