//! Descriptive timing statistics.

use crate::error::EngineError;

/// Summary of a non-empty sequence of duration samples, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (Bessel-corrected). Zero for a single
    /// sample: one observation has no spread.
    pub std_dev: f64,
}

/// Reduce duration samples to a [`TimingSummary`].
///
/// Fails with [`EngineError::InsufficientData`] on an empty input rather than
/// reporting zero/NaN statistics.
pub fn summarize(samples: &[f64]) -> Result<TimingSummary, EngineError> {
    if samples.is_empty() {
        return Err(EngineError::InsufficientData);
    }

    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    Ok(TimingSummary {
        mean,
        median,
        min: sorted[0],
        max: sorted[n - 1],
        std_dev,
    })
}
