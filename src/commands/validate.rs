use crate::affinity::library::MotifLibrary;
use crate::cli::ValidateArgs;
use crate::utils::Result;

pub fn validate(args: ValidateArgs) -> Result<()> {
    let library = MotifLibrary::load(&args.motifs_path, &args.ids_path, &args.calibration_path)?;
    let mut error_count = 0;
    let mut success_count = 0;
    let mut degenerate_count = 0;
    let mut sourced_count = 0;
    let mut widths = Vec::new();
    let mut thresholds = Vec::new();

    for (motif, id, calibration) in library.iter() {
        log::debug!(
            "{} ({}): width {}, source {}",
            id,
            motif.name,
            motif.width(),
            motif.source.as_deref().unwrap_or("unknown")
        );
        if motif.source.is_some() {
            sourced_count += 1;
        }
        widths.push(motif.width());
        thresholds.push(calibration.threshold);
        if calibration.is_degenerate() {
            degenerate_count += 1;
        }
        if motif.score_range() > 0.0 {
            success_count += 1;
        } else {
            log::error!(
                "{} ({}): motif score range is empty, affinities cannot be normalized",
                id,
                motif.name
            );
            error_count += 1;
        }
    }

    let width_stats = calculate_stats(&widths);
    let (min_threshold, max_threshold) = thresholds
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
            (lo.min(t), hi.max(t))
        });

    log::info!(
        "Motif widths - Range: [{},{}], Median: {:.2}, Mean: {:.2}, StdDev: {:.2}",
        width_stats.min,
        width_stats.max,
        width_stats.median,
        width_stats.mean,
        width_stats.std_dev
    );
    log::info!(
        "Threshold fractions - Range: [{:.3},{:.3}]",
        min_threshold,
        max_threshold
    );
    log::info!(
        "Motifs with a source annotation: {} of {}",
        sourced_count,
        library.n_motifs()
    );
    if degenerate_count > 0 {
        log::warn!(
            "{} calibrations have FP equal to SUM and will use the fallback steepness",
            degenerate_count
        );
    }

    let total = success_count + error_count;
    let success_percentage = (success_count as f64 / total as f64) * 100.0;
    let error_percentage = (error_count as f64 / total as f64) * 100.0;

    match error_count {
        0 => log::info!("Validation successful. Motifs pass={}", success_count),
        _ => log::info!(
            "Validation failed. Motifs pass={} ({:.2}%), fail={} ({:.2}%)",
            success_count,
            success_percentage,
            error_count,
            error_percentage
        ),
    }

    Ok(())
}

fn calculate_stats(data: &[usize]) -> Stats {
    let mut sorted = data.to_vec();
    sorted.sort_unstable();
    let len = sorted.len();
    if len == 0 {
        return Stats::default();
    }
    let median = if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
    } else {
        sorted[len / 2] as f64
    };
    let sum: usize = sorted.iter().sum();
    let mean = sum as f64 / len as f64;
    let std_dev = (sorted
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / len as f64)
        .sqrt();
    Stats {
        min: sorted[0],
        max: sorted[len - 1],
        mean,
        median,
        std_dev,
    }
}

#[derive(Debug, Default, PartialEq)]
struct Stats {
    min: usize,
    max: usize,
    mean: f64,
    median: f64,
    std_dev: f64,
}
