//! Timing and memory profiler.
//!
//! Executes a fallible callable under a warmup/measure protocol and records
//! one [`Sample`] per successful measured iteration. A failing iteration
//! (error return or panic) is logged and skipped; it never aborts the pass.

use std::fmt::Display;
use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::alloc::{AllocScope, AllocSnapshot};
use crate::error::EngineError;
use crate::stats::{summarize, TimingSummary};

/// Knobs for one profiling pass.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    /// Requested measured iterations. Must be at least 1.
    pub runs: u64,
    /// Untimed, error-tolerant priming calls made before measurement.
    pub warmup: u64,
    /// Wrap the measured phase in an allocation-tracing scope.
    pub measure_memory: bool,
    /// Optional time budget for the measured phase. Once exceeded, no
    /// further iterations are issued and the partial result is returned.
    /// At least one iteration is always attempted.
    pub max_total_time: Option<Duration>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            warmup: 5,
            measure_memory: true,
            max_total_time: None,
        }
    }
}

/// One measured iteration: wall-clock duration plus the tracer snapshot
/// taken right after the call returned.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub duration: Duration,
    pub alloc: AllocSnapshot,
}

/// Aggregate output of one profiling pass. Samples are in execution order;
/// `runs` counts successful iterations only, so `runs == samples.len()` and
/// may be below the requested run count.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub samples: Vec<Sample>,
    pub runs: u64,
    /// Maximum peak allocation observed across all samples.
    pub peak_bytes: u64,
}

impl BenchmarkResult {
    /// Durations in seconds, in execution order.
    pub fn durations_secs(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.duration.as_secs_f64())
            .collect()
    }

    /// Summarize the timing samples. Fails when every iteration failed.
    pub fn summary(&self) -> Result<TimingSummary, EngineError> {
        summarize(&self.durations_secs())
    }

    /// Live bytes at the end of the last successful iteration.
    pub fn current_bytes(&self) -> u64 {
        self.samples
            .last()
            .map(|s| s.alloc.current_bytes)
            .unwrap_or(0)
    }
}

/// Invoke the callable, converting both error returns and panics into a
/// rendered failure message.
pub(crate) fn checked_call<T, E, F>(f: &mut F) -> Result<T, String>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
{
    match panic::catch_unwind(AssertUnwindSafe(|| f())) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

/// Profile `f` under `config`.
///
/// Warmup invocations run first with errors swallowed entirely; they exist
/// only to absorb one-time initialization costs. The measured phase then
/// runs up to `config.runs` iterations, timing each call end-to-end. When
/// memory measurement is enabled the entire phase executes inside a single
/// [`AllocScope`]; the per-sample peak is the scope's running maximum, since
/// the tracer's peak accumulates monotonically within the scope rather than
/// per iteration.
pub fn profile<T, E, F>(config: &ProfileConfig, mut f: F) -> Result<BenchmarkResult, EngineError>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
{
    if config.runs == 0 {
        return Err(EngineError::InvalidRunCount);
    }

    for _ in 0..config.warmup {
        let _ = checked_call(&mut f);
    }

    let scope = if config.measure_memory {
        Some(AllocScope::enter()?)
    } else {
        None
    };

    let mut samples = Vec::with_capacity(config.runs as usize);
    let mut peak_bytes = 0u64;
    let phase_start = Instant::now();

    for iteration in 0..config.runs {
        if let Some(budget) = config.max_total_time {
            if iteration > 0 && phase_start.elapsed() >= budget {
                warn!(
                    completed = samples.len(),
                    requested = config.runs,
                    "measurement time budget exhausted; returning partial result"
                );
                break;
            }
        }

        let start = Instant::now();
        let outcome = checked_call(&mut f);
        let duration = start.elapsed();

        match outcome {
            Ok(value) => {
                black_box(value);
            }
            Err(message) => {
                warn!(iteration, error = %message, "measured call failed; discarding sample");
                continue;
            }
        }

        let alloc = scope.as_ref().map(|s| s.snapshot()).unwrap_or_default();
        peak_bytes = peak_bytes.max(alloc.peak_bytes);
        samples.push(Sample { duration, alloc });
    }

    drop(scope);

    let runs = samples.len() as u64;
    Ok(BenchmarkResult {
        samples,
        runs,
        peak_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_memory(runs: u64, warmup: u64) -> ProfileConfig {
        ProfileConfig {
            runs,
            warmup,
            measure_memory: false,
            max_total_time: None,
        }
    }

    #[test]
    fn records_one_sample_per_successful_run() {
        let mut calls = 0u64;
        let result = profile(&no_memory(7, 3), || {
            calls += 1;
            Ok::<u64, String>(calls)
        })
        .unwrap();

        assert_eq!(result.runs, 7);
        assert_eq!(result.samples.len(), 7);
        assert_eq!(calls, 10); // warmup + measured
    }

    #[test]
    fn zero_runs_is_rejected() {
        let result = profile(&no_memory(0, 0), || Ok::<(), String>(()));
        assert!(matches!(result, Err(EngineError::InvalidRunCount)));
    }

    #[test]
    fn failing_iterations_shrink_the_sample_count() {
        let mut calls = 0u64;
        let result = profile(&no_memory(6, 0), || {
            calls += 1;
            if calls % 2 == 0 {
                Err("flaky".to_string())
            } else {
                Ok(calls)
            }
        })
        .unwrap();

        assert_eq!(result.runs, 3);
        assert_eq!(result.samples.len(), 3);
    }

    #[test]
    fn all_failures_yield_empty_result_and_stats_refuse_it() {
        let result = profile(&no_memory(4, 2), || Err::<(), _>("broken".to_string())).unwrap();
        assert_eq!(result.runs, 0);
        assert!(matches!(
            result.summary(),
            Err(EngineError::InsufficientData)
        ));
    }

    #[test]
    fn warmup_errors_are_swallowed() {
        let mut calls = 0u64;
        let result = profile(&no_memory(2, 3), || {
            calls += 1;
            if calls <= 3 {
                Err("cold".to_string())
            } else {
                Ok(calls)
            }
        })
        .unwrap();

        assert_eq!(result.runs, 2);
    }

    #[test]
    fn panicking_callable_is_treated_as_a_failed_iteration() {
        let mut calls = 0u64;
        let result = profile(&no_memory(3, 0), || {
            calls += 1;
            if calls == 2 {
                panic!("boom");
            }
            Ok::<u64, String>(calls)
        })
        .unwrap();

        assert_eq!(result.runs, 2);
    }

    #[test]
    fn time_budget_returns_partial_result() {
        let config = ProfileConfig {
            runs: 10_000,
            warmup: 0,
            measure_memory: false,
            max_total_time: Some(Duration::from_millis(20)),
        };
        let result = profile(&config, || {
            std::thread::sleep(Duration::from_millis(2));
            Ok::<(), String>(())
        })
        .unwrap();

        assert!(result.runs >= 1);
        assert!(result.runs < 10_000);
    }
}
