//! Typed readers over a parsed query string.

use crate::validator::Validator;
use std::collections::HashMap;

/// Value for `key`, or the default when absent or empty.
pub fn read_string(params: &HashMap<String, String>, key: &str, default: &str) -> String {
    match params.get(key) {
        Some(s) if !s.is_empty() => s.clone(),
        _ => default.to_string(),
    }
}

/// Comma-separated value for `key` split into parts, or the default sequence
/// when absent or empty (never an empty split of "").
pub fn read_csv(params: &HashMap<String, String>, key: &str, default: Vec<String>) -> Vec<String> {
    match params.get(key) {
        Some(s) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => default,
    }
}

/// Integer value for `key`, or the default when absent or empty. An
/// unparseable value records a failure under `key` and returns the default
/// as a placeholder; callers must check `validator.valid()` before using it.
pub fn read_int(
    params: &HashMap<String, String>,
    key: &str,
    default: i64,
    validator: &mut Validator,
) -> i64 {
    let s = match params.get(key) {
        Some(s) if !s.is_empty() => s,
        _ => return default,
    };
    match s.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            validator.add_error(key, "must be an integer value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn read_string_falls_back_on_missing_or_empty() {
        let qs = params(&[("title", "dune"), ("empty", "")]);
        assert_eq!(read_string(&qs, "title", ""), "dune");
        assert_eq!(read_string(&qs, "empty", "fallback"), "fallback");
        assert_eq!(read_string(&qs, "missing", "fallback"), "fallback");
    }

    #[test]
    fn read_csv_splits_on_comma() {
        let qs = params(&[("genres", "drama,sci-fi")]);
        assert_eq!(read_csv(&qs, "genres", vec![]), vec!["drama", "sci-fi"]);
        assert_eq!(
            read_csv(&qs, "missing", vec!["all".to_string()]),
            vec!["all"]
        );
    }

    #[test]
    fn read_int_parses_or_records_error() {
        let qs = params(&[("page", "3"), ("page_size", "abc")]);
        let mut v = Validator::new();

        assert_eq!(read_int(&qs, "page", 1, &mut v), 3);
        assert!(v.valid());

        assert_eq!(read_int(&qs, "page_size", 20, &mut v), 20);
        assert!(!v.valid());
        assert_eq!(
            v.into_errors().get("page_size").map(String::as_str),
            Some("must be an integer value")
        );
    }

    #[test]
    fn read_int_missing_key_uses_default_silently() {
        let qs = params(&[]);
        let mut v = Validator::new();
        assert_eq!(read_int(&qs, "page", 1, &mut v), 1);
        assert!(v.valid());
    }
}
