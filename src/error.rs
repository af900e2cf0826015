use thiserror::Error;

/// Errors surfaced by the benchmarking engine.
///
/// Verification mismatches and degenerate comparison inputs (zero baseline
/// time or memory) are deliberately NOT represented here: the former is a
/// first-class outcome reported per case, the latter resolves to a defined
/// zero delta.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Statistics were requested over zero successful samples.
    #[error("no samples to summarize (all measured iterations failed?)")]
    InsufficientData,

    /// `runs == 0` was requested.
    #[error("run count must be at least 1")]
    InvalidRunCount,

    /// Another allocation-tracing scope is already active in this process.
    #[error("allocation tracer is already in use by another profiling pass")]
    TracerBusy,
}
