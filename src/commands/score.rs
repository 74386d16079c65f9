use crate::affinity::{
    library::MotifLibrary,
    load_sequences,
    region_filter::reduce_to_mapped_regions,
    score_sequences,
    writers::MatrixWriter,
    BackgroundModel, ScanContext, Sequence,
};
use crate::cli::ScoreArgs;
use crate::utils::Result;
use std::time;

pub fn score(args: ScoreArgs) -> Result<()> {
    let start_timer = time::Instant::now();

    let library = MotifLibrary::load(&args.motifs_path, &args.ids_path, &args.calibration_path)?;
    log::info!("Loaded {} motifs", library.n_motifs());

    let background = BackgroundModel::select(&args.genome);
    log::info!("Using background {} for genome {}", background, args.genome);

    let mut sequences = load_sequences(&args.sequences_path)?;
    log::info!(
        "Loaded {} sequences ({} bp) from {}",
        sequences.len(),
        sequences.iter().map(Sequence::len).sum::<usize>(),
        args.sequences_path.display()
    );

    if let Some(gene_file) = &args.gene_file {
        sequences = reduce_to_mapped_regions(sequences, gene_file, None)?;
    }

    let context = ScanContext::new(library, background, args.aggregation, args.mode);
    let matrix = score_sequences(&context, &sequences, args.num_threads)?;

    let mut writer = MatrixWriter::new(&args.output_path)?;
    writer.write(&matrix)?;
    writer.finish()?;
    log::info!(
        "Wrote {}x{} matrix to {}",
        matrix.n_rows(),
        matrix.n_cols(),
        args.output_path.display()
    );

    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}
