//! Pooling of motif match scores into a bounded affinity.
//!
//! Given normalized match scores `s_i`, a steepness `w` and a baseline `b`
//! derived from the motif calibration, the affinity is
//!
//! ```text
//! A = sum(exp(w * s_i)) / (b + sum(exp(w * s_i)))
//! ```
//!
//! The sum is evaluated as a log-sum-exp so that steep calibrations do not
//! overflow. With no matches the affinity is exactly zero.

use crate::affinity::library::Calibration;
use std::str::FromStr;

/// Denominator substituted for `FP - SUM` when the calibration is degenerate.
pub const FALLBACK_DENOMINATOR: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationType {
    /// `w = ln(9) / (FP - SUM)`, `b = exp(w * SUM)`
    Logistic9,
    /// `w = ln(6) / (FP - SUM)`, `b = 4 * exp(w * SUM)`
    #[default]
    Logistic6,
}

impl FromStr for AggregationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(AggregationType::Logistic9),
            "1" => Ok(AggregationType::Logistic6),
            _ => Err(format!("Invalid aggregation type '{}', must be 0 or 1", s)),
        }
    }
}

impl AggregationType {
    fn odds(&self) -> f64 {
        match self {
            AggregationType::Logistic9 => 9.0,
            AggregationType::Logistic6 => 6.0,
        }
    }

    fn baseline_factor(&self) -> f64 {
        match self {
            AggregationType::Logistic9 => 1.0,
            AggregationType::Logistic6 => 4.0,
        }
    }
}

/// Sigmoid steepness and log-baseline for one motif calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidParams {
    pub steepness: f64,
    pub ln_baseline: f64,
    /// Set when the fallback denominator replaced `FP - SUM`.
    pub degenerate: bool,
}

impl SigmoidParams {
    pub fn new(calibration: &Calibration, aggregation: AggregationType) -> Self {
        let ln_odds = aggregation.odds().ln();
        let mut denominator = calibration.fp - calibration.sum;
        let mut degenerate = false;
        if denominator == 0.0 || !(ln_odds / denominator).is_finite() {
            denominator = FALLBACK_DENOMINATOR;
            degenerate = true;
        }
        let steepness = ln_odds / denominator;
        let ln_baseline = aggregation.baseline_factor().ln() + steepness * calibration.sum;
        Self {
            steepness,
            ln_baseline,
            degenerate,
        }
    }
}

/// Maps a raw score to `[0, 1]` over the motif score range.
#[inline]
pub fn normalize(score: f64, min_score: f64, max_score: f64) -> f64 {
    (score - min_score) / (max_score - min_score)
}

fn log_sum_exp(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY || max.is_nan() {
        return max;
    }
    max + values.map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// Pools normalized match scores into an affinity in `[0, 1]`.
pub fn pool_normalized(normalized: &[f64], params: &SigmoidParams) -> f64 {
    if normalized.is_empty() {
        return 0.0;
    }
    let ln_total = log_sum_exp(normalized.iter().map(|s| params.steepness * s));
    let affinity = 1.0 / (1.0 + (params.ln_baseline - ln_total).exp());
    if affinity.is_nan() {
        0.0
    } else {
        affinity
    }
}

/// Normalizes raw match scores and pools them into one affinity value.
pub fn aggregate(
    raw_scores: &[f64],
    min_score: f64,
    max_score: f64,
    params: &SigmoidParams,
) -> f64 {
    let normalized: Vec<f64> = raw_scores
        .iter()
        .map(|&s| normalize(s, min_score, max_score))
        .collect();
    pool_normalized(&normalized, params)
}
