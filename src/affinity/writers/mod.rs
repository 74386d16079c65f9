pub mod write_fasta;
pub mod write_matrix;

pub use write_fasta::FastaWriter;
pub use write_matrix::MatrixWriter;
