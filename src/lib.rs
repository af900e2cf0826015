//! Benchmark and differential-verification engine.
//!
//! The library measures wall-clock time and peak allocation of a callable
//! under a warmup/measure protocol ([`harness`]), reduces the samples to
//! descriptive statistics ([`stats`]), checks two implementations for
//! functional equivalence over a corpus ([`verify`]), and classifies a
//! before/after pair as improved/regressed/unchanged ([`compare`]).
//! [`dataset`] and [`coerce`] supply reproducible synthetic inputs and
//! CLI-literal argument parsing; [`schema`] and [`report`] render results
//! as JSON records and fixed-width tables.
//!
//! Execution is strictly single-threaded and synchronous: one profiling
//! pass at a time, enforced by the exclusive allocation-tracing scope in
//! [`alloc`].

pub mod alloc;
pub mod coerce;
pub mod compare;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod report;
pub mod routines;
pub mod schema;
pub mod stats;
pub mod verify;

pub use compare::{compare, CompareConfig, Comparison, Speedup, Verdict};
pub use error::EngineError;
pub use harness::{profile, BenchmarkResult, ProfileConfig, Sample};
pub use stats::{summarize, TimingSummary};
pub use verify::{verify, CaseOutcome, CaseSide, VerifyReport};
