//! Differential verification of two implementations over a shared corpus.
//!
//! A mismatch is a deterministic verdict, not a flake: there are no retries,
//! and a failing case never prevents the rest of the corpus from running.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::harness::checked_call;

/// What one side of a case produced: a rendered output value, or a rendered
/// error when the invocation returned `Err` or panicked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CaseSide {
    Output(String),
    Error(String),
}

impl CaseSide {
    pub fn is_error(&self) -> bool {
        matches!(self, CaseSide::Error(_))
    }
}

/// Result of one corpus case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub index: usize,
    /// Rendered arguments, kept for reporting.
    pub arguments: String,
    pub reference: CaseSide,
    pub candidate: CaseSide,
    /// Deep structural equality of the two outputs. Always `false` when
    /// either side errored.
    pub matched: bool,
}

/// Aggregate verdict over a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub all_passed: bool,
    pub outcomes: Vec<CaseOutcome>,
}

impl VerifyReport {
    pub fn mismatch_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.matched).count()
    }
}

/// Run `reference` and `candidate` over every case in corpus order.
///
/// The two sides are invoked independently and never interleaved within a
/// case; each invocation is guarded against panics. Equality is structural
/// (`PartialEq`), not identity; floating-point outputs compare with native
/// `f64` equality. An empty corpus vacuously passes.
pub fn verify<C, T, E, R, A>(mut reference: R, mut candidate: A, corpus: &[C]) -> VerifyReport
where
    C: Debug,
    T: PartialEq + Debug,
    E: Display,
    R: FnMut(&C) -> Result<T, E>,
    A: FnMut(&C) -> Result<T, E>,
{
    let mut outcomes = Vec::with_capacity(corpus.len());
    let mut all_passed = true;

    for (index, case) in corpus.iter().enumerate() {
        let ref_out = checked_call(&mut || reference(case));
        let cand_out = checked_call(&mut || candidate(case));

        let matched = matches!((&ref_out, &cand_out), (Ok(a), Ok(b)) if a == b);
        all_passed &= matched;

        outcomes.push(CaseOutcome {
            index,
            arguments: format!("{case:?}"),
            reference: render(ref_out),
            candidate: render(cand_out),
            matched,
        });
    }

    VerifyReport {
        all_passed,
        outcomes,
    }
}

fn render<T: Debug>(side: Result<T, String>) -> CaseSide {
    match side {
        Ok(value) => CaseSide::Output(format!("{value:?}")),
        Err(message) => CaseSide::Error(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_scan(xs: &Vec<i64>) -> Result<i64, String> {
        let mut it = xs.iter();
        let first = *it.next().ok_or("empty input")?;
        Ok(it.fold(first, |m, &x| if x > m { x } else { m }))
    }

    fn max_builtin(xs: &Vec<i64>) -> Result<i64, String> {
        xs.iter().copied().max().ok_or_else(|| "empty input".to_string())
    }

    fn min_builtin(xs: &Vec<i64>) -> Result<i64, String> {
        xs.iter().copied().min().ok_or_else(|| "empty input".to_string())
    }

    fn find_max_corpus() -> Vec<Vec<i64>> {
        vec![vec![1, 2, 3], vec![3, 2, 1], vec![-1, -2, -3], vec![5]]
    }

    #[test]
    fn equivalent_implementations_pass_every_case() {
        let report = verify(max_scan, max_builtin, &find_max_corpus());
        assert!(report.all_passed);
        assert_eq!(report.outcomes.len(), 4);
        assert!(report.outcomes.iter().all(|o| o.matched));
    }

    #[test]
    fn broken_candidate_is_caught_without_aborting_the_corpus() {
        let report = verify(max_scan, min_builtin, &find_max_corpus());
        assert!(!report.all_passed);
        // [-1,-2,-3] and the two ascending/descending triples disagree;
        // the singleton still matches.
        assert!(report.mismatch_count() >= 1);
        assert!(report.outcomes[3].matched);
        assert_eq!(report.outcomes.len(), 4);
    }

    #[test]
    fn erroring_case_is_recorded_and_later_cases_still_run() {
        let corpus = vec![vec![], vec![4, 4]];
        let report = verify(max_scan, max_builtin, &corpus);

        assert!(!report.all_passed);
        assert!(report.outcomes[0].reference.is_error());
        assert!(report.outcomes[0].candidate.is_error());
        assert!(!report.outcomes[0].matched);
        assert!(report.outcomes[1].matched);
    }

    #[test]
    fn panicking_side_becomes_an_error_outcome() {
        let report = verify(
            |xs: &Vec<i64>| -> Result<i64, String> { Ok(xs[10_000]) },
            max_builtin,
            &vec![vec![1, 2, 3]],
        );

        assert!(!report.all_passed);
        assert!(report.outcomes[0].reference.is_error());
        assert!(!report.outcomes[0].candidate.is_error());
    }

    #[test]
    fn matched_flags_are_symmetric_under_swap() {
        let corpus = find_max_corpus();
        let forward = verify(max_scan, min_builtin, &corpus);
        let backward = verify(min_builtin, max_scan, &corpus);

        let f: Vec<bool> = forward.outcomes.iter().map(|o| o.matched).collect();
        let b: Vec<bool> = backward.outcomes.iter().map(|o| o.matched).collect();
        assert_eq!(f, b);
    }

    #[test]
    fn empty_corpus_vacuously_passes() {
        let report = verify(max_scan, max_builtin, &[]);
        assert!(report.all_passed);
        assert!(report.outcomes.is_empty());
    }
}
