//! Best-effort coercion of CLI-supplied literal tokens into structured
//! argument values.
//!
//! Malformed literals are user input, not system faults: anything that does
//! not parse falls back silently to the raw string.

use serde_json::Value;

/// Parse one literal token.
///
/// `true`/`false` (any ASCII case) become booleans; everything else is tried
/// as JSON (numbers, arrays, objects, quoted strings) and kept as a raw
/// string on parse failure.
pub fn coerce_literal(token: &str) -> Value {
    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    serde_json::from_str::<Value>(token).unwrap_or_else(|_| Value::String(token.to_string()))
}

/// Coerce a whole argument list.
pub fn coerce_args(tokens: &[String]) -> Vec<Value> {
    tokens.iter().map(|t| coerce_literal(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booleans_are_case_insensitive() {
        assert_eq!(coerce_literal("true"), Value::Bool(true));
        assert_eq!(coerce_literal("TRUE"), Value::Bool(true));
        assert_eq!(coerce_literal("False"), Value::Bool(false));
    }

    #[test]
    fn numbers_and_collections_parse_as_json() {
        assert_eq!(coerce_literal("42"), json!(42));
        assert_eq!(coerce_literal("-3.5"), json!(-3.5));
        assert_eq!(coerce_literal("[1,2,3]"), json!([1, 2, 3]));
        assert_eq!(coerce_literal(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(coerce_literal(r#""quoted""#), json!("quoted"));
    }

    #[test]
    fn malformed_literals_fall_back_to_raw_strings() {
        assert_eq!(coerce_literal("not json"), json!("not json"));
        assert_eq!(coerce_literal("[1,2"), json!("[1,2"));
        assert_eq!(coerce_literal("(1, 2)"), json!("(1, 2)"));
    }
}
