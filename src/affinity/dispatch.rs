//! Motif-parallel scoring.
//!
//! Each motif is an independent job run on a fixed-size rayon pool. Finished
//! rows travel over a bounded channel to a collector thread that places them
//! by motif index, so completion order never affects the matrix.

use crate::affinity::{
    job::{MotifJob, MotifRow, ScanContext},
    matrix::ScoreMatrix,
    sequence::Sequence,
};
use crate::utils::Result;
use crossbeam_channel::{bounded, Receiver};
use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPoolBuilder,
};
use std::thread;

const CHANNEL_BUFFER_SIZE: usize = 256;

pub fn score_sequences(
    context: &ScanContext,
    sequences: &[Sequence],
    num_threads: usize,
) -> Result<ScoreMatrix> {
    run_jobs(context.jobs(sequences), sequences.len(), num_threads)
}

pub fn run_jobs(jobs: Vec<MotifJob<'_>>, n_cols: usize, num_threads: usize) -> Result<ScoreMatrix> {
    let n_rows = jobs.len();

    log::debug!("Initializing thread pool with {} threads...", num_threads);
    let pool = initialize_thread_pool(num_threads)?;

    let (sender_row, receiver_row) = bounded(CHANNEL_BUFFER_SIZE);
    let collector_thread = thread::spawn(move || collect_rows(receiver_row, n_rows, n_cols));

    pool.install(|| {
        jobs.into_par_iter()
            .for_each_with(sender_row, |s, job| {
                let row = job.run();
                if let Err(e) = s.send(row) {
                    log::error!(
                        "Failed to send row for motif {} to collector thread: {}",
                        job.motif_id,
                        e
                    );
                }
            });
    });

    collector_thread
        .join()
        .map_err(|_| "Row collector thread panicked".to_string())?
}

fn collect_rows(receiver: Receiver<MotifRow>, n_rows: usize, n_cols: usize) -> Result<ScoreMatrix> {
    let mut slots: Vec<Option<Vec<f64>>> = vec![None; n_rows];
    let mut failures = 0;

    for row in &receiver {
        failures += row.failures;
        let slot = slots
            .get_mut(row.motif_index)
            .ok_or_else(|| format!("Motif index {} out of range", row.motif_index))?;
        if slot.replace(row.values).is_some() {
            return Err(format!("Duplicate row for motif index {}", row.motif_index));
        }
    }
    log::trace!("Collector thread finished");

    if failures > 0 {
        log::info!("{} sequence scans failed and were scored 0", failures);
    }

    let rows = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or_else(|| format!("No result for motif index {}", index)))
        .collect::<Result<Vec<_>>>()?;
    ScoreMatrix::new(rows, n_cols)
}

fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("motifscore-{}", i))
        .start_handler(|_thread_index| {
            log::trace!("Initialized thread {:?}", std::thread::current().id());
        })
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}
