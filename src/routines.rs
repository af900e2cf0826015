//! Builtin routine registry.
//!
//! The CLI resolves target callables by name from this table; an unknown
//! name is a fatal load failure. Each routine takes coerced positional
//! arguments and produces a structured value, so any two routines with the
//! same contract can be profiled against each other or differentially
//! verified. Numeric routines normalize their output to `f64` so both sides
//! of a pair render structurally identical values.

use serde_json::Value;
use thiserror::Error;

/// Invocation failure inside a routine. Recovered by the caller: the
/// profiler skips the iteration, the verifier records an error outcome.
#[derive(Debug, Clone, Error)]
pub enum RoutineError {
    #[error("{routine}: expected {expected} argument(s), got {got}")]
    Arity {
        routine: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{routine}: expected an array argument")]
    ExpectedArray { routine: &'static str },
    #[error("{routine}: element {index} is not a number")]
    ExpectedNumber {
        routine: &'static str,
        index: usize,
    },
    #[error("{routine}: element {index} is not an integer")]
    ExpectedInteger {
        routine: &'static str,
        index: usize,
    },
    #[error("{routine}: input array is empty")]
    EmptyInput { routine: &'static str },
}

pub type RoutineFn = fn(&[Value]) -> Result<Value, RoutineError>;

/// One named, loadable callable.
pub struct Routine {
    pub name: &'static str,
    pub summary: &'static str,
    pub run: RoutineFn,
}

/// All builtin routines, in listing order.
pub const ROUTINES: &[Routine] = &[
    Routine {
        name: "find_max_scan",
        summary: "maximum of a numeric array via a manual scan",
        run: find_max_scan,
    },
    Routine {
        name: "find_max_fold",
        summary: "maximum of a numeric array via iterator fold",
        run: find_max_fold,
    },
    Routine {
        name: "find_min_scan",
        summary: "minimum of a numeric array via a manual scan",
        run: find_min_scan,
    },
    Routine {
        name: "sum_values",
        summary: "sum of a numeric array",
        run: sum_values,
    },
    Routine {
        name: "dedup_sorted_scan",
        summary: "sorted distinct integers via sort + adjacent dedup",
        run: dedup_sorted_scan,
    },
    Routine {
        name: "dedup_sorted_set",
        summary: "sorted distinct integers via an ordered set",
        run: dedup_sorted_set,
    },
];

/// Resolve a routine by name.
pub fn lookup(name: &str) -> Option<&'static Routine> {
    ROUTINES.iter().find(|r| r.name == name)
}

fn one_array<'a>(routine: &'static str, args: &'a [Value]) -> Result<&'a [Value], RoutineError> {
    if args.len() != 1 {
        return Err(RoutineError::Arity {
            routine,
            expected: 1,
            got: args.len(),
        });
    }
    args[0]
        .as_array()
        .map(|v| v.as_slice())
        .ok_or(RoutineError::ExpectedArray { routine })
}

fn numbers(routine: &'static str, values: &[Value]) -> Result<Vec<f64>, RoutineError> {
    values
        .iter()
        .enumerate()
        .map(|(index, v)| v.as_f64().ok_or(RoutineError::ExpectedNumber { routine, index }))
        .collect()
}

fn integers(routine: &'static str, values: &[Value]) -> Result<Vec<i64>, RoutineError> {
    values
        .iter()
        .enumerate()
        .map(|(index, v)| v.as_i64().ok_or(RoutineError::ExpectedInteger { routine, index }))
        .collect()
}

fn number_value(x: f64) -> Value {
    // Inputs come through as_f64, so x is always finite here.
    serde_json::Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null)
}

fn find_max_scan(args: &[Value]) -> Result<Value, RoutineError> {
    const NAME: &str = "find_max_scan";
    let xs = numbers(NAME, one_array(NAME, args)?)?;
    let mut it = xs.into_iter();
    let mut best = it.next().ok_or(RoutineError::EmptyInput { routine: NAME })?;
    for x in it {
        if x > best {
            best = x;
        }
    }
    Ok(number_value(best))
}

fn find_max_fold(args: &[Value]) -> Result<Value, RoutineError> {
    const NAME: &str = "find_max_fold";
    let xs = numbers(NAME, one_array(NAME, args)?)?;
    xs.into_iter()
        .reduce(f64::max)
        .map(number_value)
        .ok_or(RoutineError::EmptyInput { routine: NAME })
}

fn find_min_scan(args: &[Value]) -> Result<Value, RoutineError> {
    const NAME: &str = "find_min_scan";
    let xs = numbers(NAME, one_array(NAME, args)?)?;
    let mut it = xs.into_iter();
    let mut best = it.next().ok_or(RoutineError::EmptyInput { routine: NAME })?;
    for x in it {
        if x < best {
            best = x;
        }
    }
    Ok(number_value(best))
}

fn sum_values(args: &[Value]) -> Result<Value, RoutineError> {
    const NAME: &str = "sum_values";
    let xs = numbers(NAME, one_array(NAME, args)?)?;
    Ok(number_value(xs.iter().sum()))
}

fn dedup_sorted_scan(args: &[Value]) -> Result<Value, RoutineError> {
    const NAME: &str = "dedup_sorted_scan";
    let mut xs = integers(NAME, one_array(NAME, args)?)?;
    xs.sort_unstable();
    xs.dedup();
    Ok(Value::Array(xs.into_iter().map(Value::from).collect()))
}

fn dedup_sorted_set(args: &[Value]) -> Result<Value, RoutineError> {
    const NAME: &str = "dedup_sorted_set";
    let xs = integers(NAME, one_array(NAME, args)?)?;
    let set: std::collections::BTreeSet<i64> = xs.into_iter().collect();
    Ok(Value::Array(set.into_iter().map(Value::from).collect()))
}
