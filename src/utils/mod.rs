pub mod io_utils;
pub mod readers;
pub mod region;
pub mod util;

pub use io_utils::{create_writer, derived_fasta_path, finish_writer, OutputSink};
pub use readers::{is_gzipped, open_input_reader};
pub use region::{parse_region_key, GenomicRegion, RegionKey};
pub use util::{handle_error_and_exit, with_path_context, Result};
