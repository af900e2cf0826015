//! Human-readable table rendering.
//!
//! The CLI prints these to stderr; the JSON record goes to stdout or a file.

use crate::schema::{BenchRecord, ComparisonRecord};
use crate::verify::{CaseOutcome, CaseSide, VerifyReport};

const BAR: &str = "==================================================";

/// Render one profiling pass as a fixed-width table.
pub fn format_result_table(record: &BenchRecord, title: &str) -> String {
    let mut lines = vec![
        String::new(),
        BAR.to_string(),
        format!("{title:^50}"),
        BAR.to_string(),
        format!("Runs:              {}", record.runs),
        format!("Average Time:      {:.4} ms", record.timing.avg_time_ms),
        format!("Median Time:       {:.4} ms", record.timing.median_time_ms),
        format!("Min Time:          {:.4} ms", record.timing.min_time_ms),
        format!("Max Time:          {:.4} ms", record.timing.max_time_ms),
        format!("Std Deviation:     {:.4} ms", record.timing.std_dev_ms),
        format!("Peak Memory:       {:.2} KB", record.memory.memory_peak_kb),
    ];
    lines.push(BAR.to_string());
    lines.join("\n")
}

/// Render a before/after comparison.
pub fn format_comparison_table(analysis: &ComparisonRecord) -> String {
    let speedup = match analysis.time.speedup_factor {
        Some(v) => format!("{v:.2}x"),
        None => "inf".to_string(),
    };

    let lines = vec![
        String::new(),
        BAR.to_string(),
        format!("{:^50}", "COMPARISON RESULTS"),
        BAR.to_string(),
        String::new(),
        "TIME:".to_string(),
        format!("  Before:     {:.4} ms", analysis.time.before_ms),
        format!("  After:      {:.4} ms", analysis.time.after_ms),
        format!("  Change:     {:+.2}%", analysis.time.change_pct),
        format!("  Speedup:    {speedup}"),
        String::new(),
        "MEMORY:".to_string(),
        format!("  Before:     {:.2} KB", analysis.memory.before_kb),
        format!("  After:      {:.2} KB", analysis.memory.after_kb),
        format!("  Change:     {:+.2}%", analysis.memory.change_pct),
        String::new(),
        format!("VERDICT: {}", analysis.verdict),
        BAR.to_string(),
    ];
    lines.join("\n")
}

fn format_case(outcome: &CaseOutcome) -> String {
    match (&outcome.reference, &outcome.candidate) {
        _ if outcome.matched => {
            format!(
                "  ok   case {}: args={}",
                outcome.index + 1,
                outcome.arguments
            )
        }
        (CaseSide::Error(e), _) | (_, CaseSide::Error(e)) => {
            format!(
                "  ERR  case {}: {} (args={})",
                outcome.index + 1,
                e,
                outcome.arguments
            )
        }
        (CaseSide::Output(a), CaseSide::Output(b)) => {
            format!(
                "  FAIL case {}: reference={} candidate={} (args={})",
                outcome.index + 1,
                a,
                b,
                outcome.arguments
            )
        }
    }
}

/// Render per-case verification lines plus a summary.
pub fn format_verify_report(report: &VerifyReport) -> String {
    let mut lines: Vec<String> = report.outcomes.iter().map(format_case).collect();

    lines.push(BAR.to_string());
    if report.all_passed {
        lines.push(format!("All {} cases passed", report.outcomes.len()));
    } else {
        lines.push(format!(
            "{} of {} cases failed - candidate may be incorrect",
            report.mismatch_count(),
            report.outcomes.len()
        ));
    }
    lines.join("\n")
}
