//! Per-request validation accumulator and predicate helpers.

use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Collects named validation failures for one request. Created empty,
/// populated during validation, read once to build the 422 response.
#[derive(Debug, Default)]
pub struct Validator {
    errors: HashMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no failures have been recorded.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` under `key`. The first message per key wins; later
    /// calls for the same key are no-ops.
    pub fn add_error(&mut self, key: &str, message: &str) {
        self.errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record `message` under `key` only when the check is not ok.
    pub fn check(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_error(key, message);
        }
    }

    /// Consume the accumulated failures for the error response body.
    pub fn into_errors(self) -> HashMap<String, String> {
        self.errors
    }
}

/// True if `value` equals one of the entries in `list`.
pub fn in_list(value: &str, list: &[&str]) -> bool {
    list.iter().any(|item| *item == value)
}

/// True if `value` matches the pattern.
pub fn matches(value: &str, pattern: &Regex) -> bool {
    pattern.is_match(value)
}

/// True if all values are distinct (exact string equality). Empty input is
/// trivially unique.
pub fn unique(values: &[String]) -> bool {
    let distinct: HashSet<&str> = values.iter().map(String::as_str).collect();
    distinct.len() == values.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_valid() {
        assert!(Validator::new().valid());
    }

    #[test]
    fn check_records_only_failures() {
        let mut v = Validator::new();
        v.check(true, "title", "must be provided");
        assert!(v.valid());
        v.check(false, "title", "must be provided");
        assert!(!v.valid());
        assert_eq!(
            v.into_errors().get("title").map(String::as_str),
            Some("must be provided")
        );
    }

    #[test]
    fn first_error_per_key_wins() {
        let mut v = Validator::new();
        v.add_error("x", "first");
        v.add_error("x", "second");
        let errors = v.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("x").map(String::as_str), Some("first"));
    }

    #[test]
    fn in_list_is_exact_membership() {
        assert!(in_list("year", &["id", "title", "year"]));
        assert!(!in_list("-year", &["id", "title", "year"]));
        assert!(!in_list("year", &[]));
    }

    #[test]
    fn matches_applies_pattern() {
        let re = Regex::new(r"^\d{4}$").unwrap();
        assert!(matches("1999", &re));
        assert!(!matches("199x", &re));
    }

    #[test]
    fn unique_detects_duplicates() {
        let dup = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let ok = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert!(!unique(&dup));
        assert!(unique(&ok));
        assert!(unique(&[]));
    }
}
