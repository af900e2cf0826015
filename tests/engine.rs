//! End-to-end scenarios: profile, verify, compare, and report round-trips.

use std::time::Duration;

use optibench::compare::{compare, CompareConfig, Speedup, Verdict};
use optibench::harness::{profile, ProfileConfig};
use optibench::routines::lookup;
use optibench::schema::{BenchRecord, BenchReport, RunMeta};
use optibench::verify;
use serde_json::{json, Value};

#[global_allocator]
static ALLOC: optibench::alloc::TrackingAllocator = optibench::alloc::TrackingAllocator;

fn timing_only(runs: u64, warmup: u64) -> ProfileConfig {
    ProfileConfig {
        runs,
        warmup,
        measure_memory: false,
        max_total_time: None,
    }
}

#[test]
fn profiling_a_fixed_sleep_yields_full_sample_count() {
    let pause = Duration::from_millis(5);
    let result = profile(&timing_only(5, 1), || {
        std::thread::sleep(pause);
        Ok::<(), String>(())
    })
    .unwrap();

    assert_eq!(result.runs, 5);
    assert_eq!(result.samples.len(), 5);
    for sample in &result.samples {
        assert!(sample.duration >= pause);
    }

    let summary = result.summary().unwrap();
    assert!(summary.mean >= pause.as_secs_f64());
    // Generous band: sleep overshoots under scheduler load, never undershoots.
    assert!(summary.mean < 0.1);
    assert!(summary.min <= summary.median && summary.median <= summary.max);
}

// All memory-sensitive assertions live in one test: the allocation-tracing
// scope is process-wide and exclusive, and test threads run concurrently.
#[test]
fn memory_measurement_tracks_peak_allocation() {
    const CHUNK: usize = 1 << 20;

    let config = ProfileConfig {
        runs: 3,
        warmup: 1,
        measure_memory: true,
        max_total_time: None,
    };
    let result = profile(&config, || {
        let buf = vec![7u8; CHUNK];
        Ok::<usize, String>(buf.len())
    })
    .unwrap();

    assert_eq!(result.runs, 3);
    assert!(result.peak_bytes >= CHUNK as u64);
    for sample in &result.samples {
        assert!(sample.alloc.current_bytes <= sample.alloc.peak_bytes);
    }
    // Peak accumulates monotonically within the scope.
    let peaks: Vec<u64> = result.samples.iter().map(|s| s.alloc.peak_bytes).collect();
    assert!(peaks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(result.peak_bytes, *peaks.last().unwrap());
}

fn routine_corpus() -> Vec<Vec<Value>> {
    vec![
        vec![json!([1, 2, 3])],
        vec![json!([3, 2, 1])],
        vec![json!([-1, -2, -3])],
        vec![json!([5])],
    ]
}

#[test]
fn equivalent_max_implementations_verify_cleanly() {
    let reference = lookup("find_max_scan").unwrap();
    let candidate = lookup("find_max_fold").unwrap();

    let report = verify(
        |case: &Vec<Value>| (reference.run)(case),
        |case: &Vec<Value>| (candidate.run)(case),
        &routine_corpus(),
    );

    assert!(report.all_passed);
    assert_eq!(report.outcomes.len(), 4);
    assert!(report.outcomes.iter().all(|o| o.matched));
}

#[test]
fn broken_candidate_fails_verification_without_aborting() {
    let reference = lookup("find_max_scan").unwrap();
    let broken = lookup("find_min_scan").unwrap();

    let report = verify(
        |case: &Vec<Value>| (reference.run)(case),
        |case: &Vec<Value>| (broken.run)(case),
        &routine_corpus(),
    );

    assert!(!report.all_passed);
    assert!(report.mismatch_count() >= 1);
    // The singleton case agrees even for min-vs-max.
    assert!(report.outcomes[3].matched);
    assert_eq!(report.outcomes.len(), 4);
}

#[test]
fn faster_candidate_earns_an_improved_verdict() {
    let baseline = profile(&timing_only(3, 0), || {
        std::thread::sleep(Duration::from_millis(50));
        Ok::<(), String>(())
    })
    .unwrap();
    let candidate = profile(&timing_only(3, 0), || {
        std::thread::sleep(Duration::from_millis(5));
        Ok::<(), String>(())
    })
    .unwrap();

    let comparison = compare(&baseline, &candidate, &CompareConfig::default()).unwrap();
    assert_eq!(comparison.verdict, Verdict::Improved);
    assert!(comparison.time_delta_pct > 0.0);
    match comparison.speedup {
        Speedup::Finite(ratio) => assert!(ratio > 1.0),
        Speedup::Infinite => panic!("sleeping candidate cannot have zero mean"),
    }
}

#[test]
fn report_survives_a_file_round_trip() {
    let result = profile(&timing_only(4, 0), || Ok::<u64, String>(99)).unwrap();
    let report = BenchReport {
        run: RunMeta {
            schema_version: 1,
            tool_version: "test".to_string(),
            timestamp_utc: "unix:0".to_string(),
            seed: 42,
        },
        result: BenchRecord::from_result("noop", "builtin", "[]", &result).unwrap(),
        comparison: None,
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    std::fs::write(&path, serde_json::to_string_pretty(&report).unwrap()).unwrap();

    let loaded: BenchReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.result.function, "noop");
    assert_eq!(loaded.result.runs, 4);
    assert!(loaded.comparison.is_none());
}
