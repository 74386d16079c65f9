pub mod aggregate;
pub mod background;
pub mod dispatch;
pub mod job;
pub mod library;
pub mod matrix;
pub mod motif;
pub mod region_filter;
pub mod scan;
pub mod sequence;
pub mod writers;

pub use aggregate::AggregationType;
pub use background::BackgroundModel;
pub use dispatch::score_sequences;
pub use job::{ScanContext, ScoringMode};
pub use library::MotifLibrary;
pub use matrix::ScoreMatrix;
pub use sequence::{load_sequences, Sequence};
