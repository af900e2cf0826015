//! Serialized report records.
//!
//! Timing is reported in milliseconds rounded to 4 decimals, memory in KB
//! rounded to 2 decimals.

use serde::{Deserialize, Serialize};

use crate::compare::Comparison;
use crate::compare::Verdict;
use crate::error::EngineError;
use crate::harness::BenchmarkResult;
use crate::verify::CaseOutcome;

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn secs_to_ms4(secs: f64) -> f64 {
    round4(secs * 1000.0)
}

fn bytes_to_kb2(bytes: u64) -> f64 {
    round2(bytes as f64 / 1024.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub tool_version: String,
    pub timestamp_utc: String,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingStatsMs {
    pub avg_time_ms: f64,
    pub median_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub std_dev_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStatsKb {
    pub memory_peak_kb: f64,
    pub memory_current_kb: f64,
}

/// One profiled function, per the persisted-record contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchRecord {
    pub function: String,
    pub source: String,
    /// Stringified argument list.
    pub arguments: String,
    pub runs: u64,
    pub timing: TimingStatsMs,
    pub memory: MemoryStatsKb,
}

impl BenchRecord {
    /// Build a record from a profiling pass. Fails when the pass produced
    /// no samples; an empty result must never be rendered as zeros.
    pub fn from_result(
        function: impl Into<String>,
        source: impl Into<String>,
        arguments: impl Into<String>,
        result: &BenchmarkResult,
    ) -> Result<Self, EngineError> {
        let summary = result.summary()?;
        Ok(Self {
            function: function.into(),
            source: source.into(),
            arguments: arguments.into(),
            runs: result.runs,
            timing: TimingStatsMs {
                avg_time_ms: secs_to_ms4(summary.mean),
                median_time_ms: secs_to_ms4(summary.median),
                min_time_ms: secs_to_ms4(summary.min),
                max_time_ms: secs_to_ms4(summary.max),
                std_dev_ms: secs_to_ms4(summary.std_dev),
            },
            memory: MemoryStatsKb {
                memory_peak_kb: bytes_to_kb2(result.peak_bytes),
                memory_current_kb: bytes_to_kb2(result.current_bytes()),
            },
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonTimeRecord {
    pub before_ms: f64,
    pub after_ms: f64,
    pub change_pct: f64,
    /// `null` means infinite (zero-duration candidate); standard JSON has
    /// no Infinity literal.
    pub speedup_factor: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMemoryRecord {
    pub before_kb: f64,
    pub after_kb: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub time: ComparisonTimeRecord,
    pub memory: ComparisonMemoryRecord,
    pub verdict: Verdict,
}

impl From<&Comparison> for ComparisonRecord {
    fn from(c: &Comparison) -> Self {
        Self {
            time: ComparisonTimeRecord {
                before_ms: secs_to_ms4(c.baseline_mean_secs),
                after_ms: secs_to_ms4(c.candidate_mean_secs),
                change_pct: round2(c.time_delta_pct),
                speedup_factor: c.speedup.as_finite().map(round2),
            },
            memory: ComparisonMemoryRecord {
                before_kb: bytes_to_kb2(c.baseline_peak_bytes),
                after_kb: bytes_to_kb2(c.candidate_peak_bytes),
                change_pct: round2(c.memory_delta_pct),
            },
            verdict: c.verdict,
        }
    }
}

/// Nested before/after block attached to a bench report when a comparison
/// pass was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonBlock {
    pub before_function: String,
    pub after_function: String,
    pub after_result: BenchRecord,
    pub analysis: ComparisonRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub run: RunMeta,
    pub result: BenchRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRecord {
    pub run: RunMeta,
    pub reference: String,
    pub candidate: String,
    pub all_passed: bool,
    pub cases: Vec<CaseOutcome>,
}
