use crate::affinity::{load_sequences, region_filter::reduce_to_mapped_regions};
use crate::cli::FilterArgs;
use crate::utils::Result;

pub fn filter(args: FilterArgs) -> Result<()> {
    let sequences = load_sequences(&args.sequences_path)?;
    reduce_to_mapped_regions(sequences, &args.gene_file, args.output_path.as_deref())?;
    Ok(())
}
