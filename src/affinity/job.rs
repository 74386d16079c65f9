use crate::affinity::{
    aggregate::{aggregate, AggregationType, SigmoidParams, FALLBACK_DENOMINATOR},
    background::BackgroundModel,
    library::{Calibration, MotifLibrary},
    motif::Motif,
    scan::{best_score, scan, ScanError},
    sequence::Sequence,
};
use std::str::FromStr;

/// What each matrix cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringMode {
    /// Calibrated affinity of the background-adjusted motif.
    #[default]
    Affinity,
    /// Best raw window score of the library motif.
    BestScan,
}

impl FromStr for ScoringMode {
    type Err = &'static str;
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "affinity" => Ok(ScoringMode::Affinity),
            "best-scan" => Ok(ScoringMode::BestScan),
            _ => Err("Invalid scoring mode. Options are: affinity, best-scan"),
        }
    }
}

/// Everything needed to score a sequence set: the loaded library and the run settings.
#[derive(Debug)]
pub struct ScanContext {
    pub library: MotifLibrary,
    pub background: BackgroundModel,
    pub aggregation: AggregationType,
    pub mode: ScoringMode,
}

impl ScanContext {
    pub fn new(
        library: MotifLibrary,
        background: BackgroundModel,
        aggregation: AggregationType,
        mode: ScoringMode,
    ) -> Self {
        Self {
            library,
            background,
            aggregation,
            mode,
        }
    }

    /// One job per motif, in library order.
    pub fn jobs<'a>(&'a self, sequences: &'a [Sequence]) -> Vec<MotifJob<'a>> {
        self.library
            .iter()
            .enumerate()
            .map(|(motif_index, (motif, motif_id, calibration))| {
                let motif = match self.mode {
                    ScoringMode::Affinity => motif.adjust(&self.background),
                    ScoringMode::BestScan => motif.clone(),
                };
                MotifJob {
                    motif_index,
                    motif_id,
                    motif,
                    calibration: *calibration,
                    params: SigmoidParams::new(calibration, self.aggregation),
                    background: self.background,
                    sequences,
                    mode: self.mode,
                }
            })
            .collect()
    }
}

/// Scoring work for one motif across the whole sequence set.
#[derive(Debug)]
pub struct MotifJob<'a> {
    pub motif_index: usize,
    pub motif_id: &'a str,
    pub motif: Motif,
    pub calibration: Calibration,
    pub params: SigmoidParams,
    pub background: BackgroundModel,
    pub sequences: &'a [Sequence],
    pub mode: ScoringMode,
}

/// One full matrix row and the number of sequences that failed to scan.
#[derive(Debug, PartialEq)]
pub struct MotifRow {
    pub motif_index: usize,
    pub values: Vec<f64>,
    pub failures: usize,
}

impl MotifJob<'_> {
    pub fn run(&self) -> MotifRow {
        match self.mode {
            ScoringMode::Affinity => self.score_affinity(),
            ScoringMode::BestScan => self.score_best(),
        }
    }

    fn empty_row(&self) -> MotifRow {
        MotifRow {
            motif_index: self.motif_index,
            values: vec![0.0; self.sequences.len()],
            failures: 0,
        }
    }

    fn report_failure(&self, sequence: &Sequence, err: &ScanError) {
        log::warn!(
            "Scan failure for motif {} on sequence {}: {}",
            self.motif_id,
            sequence.key,
            err
        );
    }

    fn score_affinity(&self) -> MotifRow {
        let min_score = self.motif.min_score();
        let max_score = self.motif.max_score();
        let threshold = self.motif.threshold_score(self.calibration.threshold);
        log::debug!(
            "{}: threshold score {:.3} in [{:.3}, {:.3}] (background {})",
            self.motif_id,
            threshold,
            min_score,
            max_score,
            self.background
        );

        if !(self.motif.score_range() > 0.0) {
            log::warn!(
                "{}: motif score range is empty, all affinities set to 0",
                self.motif_id
            );
            return self.empty_row();
        }
        if self.params.degenerate {
            log::warn!(
                "{}: FP={} and SUM={} give no usable steepness, using denominator {}",
                self.motif_id,
                self.calibration.fp,
                self.calibration.sum,
                FALLBACK_DENOMINATOR
            );
        }

        let mut failures = 0;
        let values = self
            .sequences
            .iter()
            .map(
                |sequence| match scan(&self.motif, &sequence.residues, threshold) {
                    Ok(scores) => aggregate(&scores, min_score, max_score, &self.params),
                    Err(err) => {
                        self.report_failure(sequence, &err);
                        failures += 1;
                        0.0
                    }
                },
            )
            .collect();

        MotifRow {
            motif_index: self.motif_index,
            values,
            failures,
        }
    }

    fn score_best(&self) -> MotifRow {
        let mut failures = 0;
        let values = self
            .sequences
            .iter()
            .map(|sequence| match best_score(&self.motif, &sequence.residues) {
                Ok(best) => best.unwrap_or(0.0),
                Err(err) => {
                    self.report_failure(sequence, &err);
                    failures += 1;
                    0.0
                }
            })
            .collect();

        MotifRow {
            motif_index: self.motif_index,
            values,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_context(mode: ScoringMode, sum: f64, fp: f64) -> ScanContext {
        let motif = Motif::new(
            "acgt",
            vec![
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        )
        .unwrap();
        let calibrations = HashMap::from([(
            "M1".to_string(),
            Calibration::new(0.5, sum, fp).unwrap(),
        )]);
        let library = MotifLibrary::new(vec![motif], vec!["M1".to_string()], calibrations).unwrap();
        ScanContext::new(
            library,
            BackgroundModel::uniform(),
            AggregationType::Logistic6,
            mode,
        )
    }

    #[test]
    fn test_jobs_are_adjusted_for_affinity() {
        let context = make_context(ScoringMode::Affinity, 0.5, 0.6);
        let sequences = vec![Sequence::new("s1", "ACGT")];
        let jobs = context.jobs(&sequences);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].motif_id, "M1");
        assert_eq!(jobs[0].motif.weights()[0], [3.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_jobs_keep_library_motif_for_best_scan() {
        let context = make_context(ScoringMode::BestScan, 0.5, 0.6);
        let sequences = vec![Sequence::new("s1", "ACGT")];
        let jobs = context.jobs(&sequences);
        let (library_motif, _, _) = context.library.iter().next().unwrap();
        assert_eq!(&jobs[0].motif, library_motif);
    }

    #[test]
    fn test_affinity_row() {
        let context = make_context(ScoringMode::Affinity, 0.5, 0.6);
        let sequences = vec![
            Sequence::new("match", "ttACGTtt"),
            Sequence::new("no-match", "TTTTTTTT"),
        ];
        let row = context.jobs(&sequences)[0].run();
        assert_eq!(row.motif_index, 0);
        assert_eq!(row.failures, 0);
        assert!((row.values[0] - 0.9995).abs() < 1e-3);
        assert_eq!(row.values[1], 0.0);
    }

    #[test]
    fn test_scan_failure_degrades_to_zero() {
        let context = make_context(ScoringMode::Affinity, 0.5, 0.6);
        let sequences = vec![
            Sequence::new("bad", "ACGT-ACGT"),
            Sequence::new("good", "ACGT"),
        ];
        let row = context.jobs(&sequences)[0].run();
        assert_eq!(row.failures, 1);
        assert_eq!(row.values[0], 0.0);
        assert!(row.values[1] > 0.99);
    }

    #[test]
    fn test_degenerate_calibration_row_is_bounded() {
        let context = make_context(ScoringMode::Affinity, 0.5, 0.5);
        let sequences = vec![Sequence::new("s1", "ACGTACGT")];
        let row = context.jobs(&sequences)[0].run();
        assert!(row.values[0] > 0.0 && row.values[0] <= 1.0);
    }

    #[test]
    fn test_subnormal_calibration_gap_uses_fallback() {
        let fallback = make_context(ScoringMode::Affinity, 0.0, 0.0);
        let context = make_context(ScoringMode::Affinity, 0.0, 5e-324);
        let sequences = vec![Sequence::new("s1", "ACGTACGT")];
        let jobs = context.jobs(&sequences);
        assert!(jobs[0].params.degenerate);
        assert_eq!(jobs[0].params, fallback.jobs(&sequences)[0].params);

        let row = jobs[0].run();
        assert!(row.values[0] > 0.0 && row.values[0] <= 1.0);
        assert_eq!(row, fallback.jobs(&sequences)[0].run());
    }

    #[test]
    fn test_best_scan_row() {
        let context = make_context(ScoringMode::BestScan, 0.5, 0.6);
        let sequences = vec![
            Sequence::new("s1", "TTACGATT"),
            Sequence::new("s2", "AC"),
            Sequence::new("s3", "AC?T"),
        ];
        let row = context.jobs(&sequences)[0].run();
        assert_eq!(row.values, vec![3.0, 0.0, 0.0]);
        assert_eq!(row.failures, 1);
    }

    #[test]
    fn test_parse_scoring_mode() {
        assert_eq!("affinity".parse::<ScoringMode>(), Ok(ScoringMode::Affinity));
        assert_eq!("best-scan".parse::<ScoringMode>(), Ok(ScoringMode::BestScan));
        assert!("bestscan".parse::<ScoringMode>().is_err());
    }
}
