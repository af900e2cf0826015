use clap::{Parser, Subcommand};
use optibench::coerce::{coerce_args, coerce_literal};
use optibench::compare::{compare, CompareConfig};
use optibench::dataset::{generate, WorkloadConfig, WorkloadShape};
use optibench::harness::{profile, ProfileConfig};
use optibench::report::{format_comparison_table, format_result_table, format_verify_report};
use optibench::routines::{lookup, Routine, ROUTINES};
use optibench::schema::{BenchRecord, BenchReport, ComparisonBlock, RunMeta, VerifyRecord};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

// Installed here so profiled routines get real peak-memory numbers; library
// users opt in by installing it in their own binary.
#[global_allocator]
static ALLOC: optibench::alloc::TrackingAllocator = optibench::alloc::TrackingAllocator;

#[derive(Subcommand, Debug)]
enum Command {
    /// Profile a builtin routine (optionally against a second one).
    Bench {
        /// Routine name (see `optibench list`).
        function: String,

        /// Positional arguments as literals (JSON or raw strings).
        args: Vec<String>,

        /// Number of measured runs.
        #[arg(long, short = 'n', default_value_t = 100)]
        runs: u64,

        /// Warmup runs before measurement.
        #[arg(long, short = 'w', default_value_t = 5)]
        warmup: u64,

        /// Skip memory measurement.
        #[arg(long, default_value_t = false)]
        no_memory: bool,

        /// Profile a second routine over the same arguments and compare.
        #[arg(long, short = 'c', value_name = "FUNCTION")]
        compare: Option<String>,

        /// Replace positional arguments with a generated workload of this size.
        #[arg(long, short = 'g', value_name = "N")]
        generate_size: Option<usize>,

        /// Shape of the generated workload.
        #[arg(long, value_enum, default_value_t = WorkloadShape::Int)]
        shape: WorkloadShape,

        /// Minimum |time delta| percent before a verdict flips from unchanged.
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,

        /// Time budget for each measured phase, in seconds.
        #[arg(long, value_name = "SECS")]
        max_seconds: Option<f64>,
    },

    /// Differentially verify a candidate routine against a reference.
    Verify {
        reference: String,
        candidate: String,

        /// One corpus case as a JSON array of arguments; repeatable.
        /// Without any, a builtin quick corpus is used.
        #[arg(long = "case", value_name = "JSON")]
        cases: Vec<String>,
    },

    /// Emit a reproducible synthetic workload as JSON.
    Generate {
        #[arg(long, value_enum, default_value_t = WorkloadShape::Int)]
        shape: WorkloadShape,

        #[arg(long, default_value_t = 100)]
        len: usize,
    },

    /// List builtin routines.
    List,
}

#[derive(Parser, Debug)]
#[command(name = "optibench")]
#[command(about = "Benchmark and differential-verification harness (JSON output)")]
struct Args {
    /// Seed for workload generation.
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Where to write the JSON report. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

fn now_utc() -> String {
    // Good enough for report headers without a chrono dependency.
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn run_meta(seed: u64) -> RunMeta {
    RunMeta {
        schema_version: 1,
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp_utc: now_utc(),
        seed,
    }
}

/// Resolve a routine or abort the invocation: a load failure is fatal and
/// produces no partial report.
fn load_routine(name: &str) -> io::Result<&'static Routine> {
    lookup(name).ok_or_else(|| {
        io::Error::other(format!(
            "cannot load routine '{name}' (run `optibench list` for available names)"
        ))
    })
}

fn emit(out: &Option<PathBuf>, json: &str) -> io::Result<()> {
    if let Some(path) = out {
        fs::write(path, json)?;
        eprintln!("\nResults saved to: {}", path.display());
    } else {
        println!("{json}");
    }
    Ok(())
}

fn stringify_args(args: &[Value]) -> String {
    Value::Array(args.to_vec()).to_string()
}

fn builtin_corpus() -> Vec<Vec<Value>> {
    use serde_json::json;
    vec![
        vec![json!([])],
        vec![json!([1])],
        vec![json!([1, 2])],
        vec![json!([1, 2, 3, 4, 5])],
        vec![json!([-1, -2, -3])],
        vec![json!([0, 0, 0])],
        vec![json!([1, -1, 1, -1])],
        vec![json!([1, 1, 1, 1])],
        vec![json!([1, 2, 2, 3])],
    ]
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match &args.cmd {
        Command::Bench {
            function,
            args: literals,
            runs,
            warmup,
            no_memory,
            compare: compare_with,
            generate_size,
            shape,
            threshold,
            max_seconds,
        } => {
            let routine = load_routine(function)?;
            let after_routine = compare_with
                .as_deref()
                .map(load_routine)
                .transpose()?;

            let call_args: Vec<Value> = if let Some(size) = generate_size {
                let workload = generate(&WorkloadConfig {
                    shape: *shape,
                    len: *size,
                    seed: args.seed,
                });
                eprintln!(
                    "Generated test data: {size} items of type '{}'",
                    shape.as_str()
                );
                vec![workload]
            } else {
                coerce_args(literals)
            };

            let config = ProfileConfig {
                runs: *runs,
                warmup: *warmup,
                measure_memory: !no_memory,
                max_total_time: max_seconds.map(Duration::from_secs_f64),
            };

            eprintln!("\nBenchmarking: {function}()");
            eprintln!("Runs: {runs} (warmup: {warmup})");

            let result = profile(&config, || (routine.run)(&call_args))
                .map_err(io::Error::other)?;
            let record = BenchRecord::from_result(
                routine.name,
                "builtin",
                stringify_args(&call_args),
                &result,
            )
            .map_err(io::Error::other)?;
            eprintln!("{}", format_result_table(&record, "Benchmark Results"));

            let comparison = match after_routine {
                Some(after) => {
                    let after_result = profile(&config, || (after.run)(&call_args))
                        .map_err(io::Error::other)?;
                    let after_record = BenchRecord::from_result(
                        after.name,
                        "builtin",
                        stringify_args(&call_args),
                        &after_result,
                    )
                    .map_err(io::Error::other)?;
                    eprintln!("{}", format_result_table(&after_record, "After Optimization"));

                    let analysis = compare(
                        &result,
                        &after_result,
                        &CompareConfig {
                            noise_threshold_pct: *threshold,
                        },
                    )
                    .map_err(io::Error::other)?;
                    let analysis = (&analysis).into();
                    eprintln!("{}", format_comparison_table(&analysis));

                    Some(ComparisonBlock {
                        before_function: routine.name.to_string(),
                        after_function: after.name.to_string(),
                        after_result: after_record,
                        analysis,
                    })
                }
                None => None,
            };

            let report = BenchReport {
                run: run_meta(args.seed),
                result: record,
                comparison,
            };
            let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
            emit(&args.out, &json)?;
        }

        Command::Verify {
            reference,
            candidate,
            cases,
        } => {
            let reference_routine = load_routine(reference)?;
            let candidate_routine = load_routine(candidate)?;

            let corpus: Vec<Vec<Value>> = if cases.is_empty() {
                builtin_corpus()
            } else {
                cases
                    .iter()
                    .map(|token| match coerce_literal(token) {
                        Value::Array(items) => items,
                        other => vec![other],
                    })
                    .collect()
            };

            let report = optibench::verify(
                |case: &Vec<Value>| (reference_routine.run)(case),
                |case: &Vec<Value>| (candidate_routine.run)(case),
                &corpus,
            );
            eprintln!("{}", format_verify_report(&report));

            // A mismatch is an expected outcome, absorbed into the payload;
            // only load/IO failures exit non-zero.
            let record = VerifyRecord {
                run: run_meta(args.seed),
                reference: reference_routine.name.to_string(),
                candidate: candidate_routine.name.to_string(),
                all_passed: report.all_passed,
                cases: report.outcomes,
            };
            let json = serde_json::to_string_pretty(&record).map_err(io::Error::other)?;
            emit(&args.out, &json)?;
        }

        Command::Generate { shape, len } => {
            let workload = generate(&WorkloadConfig {
                shape: *shape,
                len: *len,
                seed: args.seed,
            });
            eprintln!(
                "Generated {len} items of type '{}' (seed={})",
                shape.as_str(),
                args.seed
            );
            let json = serde_json::to_string_pretty(&workload).map_err(io::Error::other)?;
            emit(&args.out, &json)?;
        }

        Command::List => {
            for routine in ROUTINES {
                println!("{:<20} {}", routine.name, routine.summary);
            }
        }
    }

    Ok(())
}
