//! Before/after comparison of two profiling passes.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::harness::BenchmarkResult;

/// Three-way classification of a candidate against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Improved,
    Regressed,
    Unchanged,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Improved => write!(f, "IMPROVED"),
            Verdict::Regressed => write!(f, "REGRESSED"),
            Verdict::Unchanged => write!(f, "UNCHANGED"),
        }
    }
}

/// Speedup ratio, with an explicit representation for a zero-duration
/// candidate instead of a non-finite float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Speedup {
    Finite(f64),
    Infinite,
}

impl Speedup {
    /// `None` means infinite; standard JSON has no Infinity literal.
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            Speedup::Finite(v) => Some(*v),
            Speedup::Infinite => None,
        }
    }
}

impl std::fmt::Display for Speedup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speedup::Finite(v) => write!(f, "{v:.2}x"),
            Speedup::Infinite => write!(f, "inf"),
        }
    }
}

/// Configuration for verdict classification.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Minimum absolute time delta (percent) required before a run is
    /// classified as improved or regressed. The default of zero keeps the
    /// raw sign-of-delta classification; CI setups raise it to suppress
    /// noise-driven verdict flapping.
    pub noise_threshold_pct: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            noise_threshold_pct: 0.0,
        }
    }
}

/// Relative verdict between a baseline and a candidate pass. Pure function
/// of its two inputs; computed once and never mutated.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub baseline_mean_secs: f64,
    pub candidate_mean_secs: f64,
    pub baseline_peak_bytes: u64,
    pub candidate_peak_bytes: u64,
    /// Positive when the candidate is faster.
    pub time_delta_pct: f64,
    /// Positive when the candidate allocates less at peak.
    pub memory_delta_pct: f64,
    pub speedup: Speedup,
    pub verdict: Verdict,
}

/// Compare two benchmark results.
///
/// Degenerate inputs resolve to defined values rather than errors: a
/// zero-duration baseline yields a zero time delta and an `Unchanged`
/// verdict (no meaningful ratio exists), and a zero-byte baseline peak
/// yields a zero memory delta. The only error condition is a result with
/// no samples at all.
pub fn compare(
    baseline: &BenchmarkResult,
    candidate: &BenchmarkResult,
    config: &CompareConfig,
) -> Result<Comparison, EngineError> {
    let baseline_mean = baseline.summary()?.mean;
    let candidate_mean = candidate.summary()?.mean;

    let time_delta_pct = if baseline_mean == 0.0 {
        0.0
    } else {
        (baseline_mean - candidate_mean) / baseline_mean * 100.0
    };

    let memory_delta_pct = if baseline.peak_bytes == 0 {
        0.0
    } else {
        (baseline.peak_bytes as f64 - candidate.peak_bytes as f64)
            / baseline.peak_bytes as f64
            * 100.0
    };

    let speedup = if candidate_mean == 0.0 {
        Speedup::Infinite
    } else {
        Speedup::Finite(baseline_mean / candidate_mean)
    };

    let verdict = if baseline_mean == 0.0 || time_delta_pct.abs() <= config.noise_threshold_pct {
        Verdict::Unchanged
    } else if time_delta_pct > 0.0 {
        Verdict::Improved
    } else {
        Verdict::Regressed
    };

    Ok(Comparison {
        baseline_mean_secs: baseline_mean,
        candidate_mean_secs: candidate_mean,
        baseline_peak_bytes: baseline.peak_bytes,
        candidate_peak_bytes: candidate.peak_bytes,
        time_delta_pct,
        memory_delta_pct,
        speedup,
        verdict,
    })
}
