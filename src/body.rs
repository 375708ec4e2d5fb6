//! Strict JSON body decoding with a closed failure taxonomy.
//!
//! Every way a client body can fail to decode maps to one [`BodyError`]
//! variant with a stable, user-actionable message. The HTTP layer switches
//! on the variant, never on message text.

use serde::de::DeserializeOwned;
use serde_json::error::Category;
use thiserror::Error;

/// Hard cap on request body size.
pub const MAX_BODY_BYTES: usize = 1_048_576;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("body contains badly-formed JSON (at character {offset})")]
    Syntax { offset: usize },
    #[error("body contains badly-formed JSON")]
    UnexpectedEof,
    #[error("body contains incorrect JSON type for field \"{field}\"")]
    FieldType { field: String },
    #[error("body contains incorrect JSON type (at character {offset})")]
    TypeAt { offset: usize },
    #[error("body must not be empty")]
    Empty,
    #[error("body contains unknown key \"{field}\"")]
    UnknownField { field: String },
    #[error("body must not be larger than {limit} bytes")]
    TooLarge { limit: usize },
    #[error("body must only contain a single JSON value")]
    MultipleValues,
    #[error("{0}")]
    Other(String),
}

/// Decode exactly one JSON value from `body` into `T`.
///
/// Enforces the size limit, rejects empty bodies and trailing data, and
/// classifies every serde_json failure. Targets are expected to carry
/// `#[serde(deny_unknown_fields)]` so stray keys surface as
/// [`BodyError::UnknownField`].
pub fn from_slice<T: DeserializeOwned>(body: &[u8]) -> Result<T, BodyError> {
    if body.len() > MAX_BODY_BYTES {
        return Err(BodyError::TooLarge {
            limit: MAX_BODY_BYTES,
        });
    }
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(BodyError::Empty);
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value = match serde_path_to_error::deserialize::<_, T>(&mut de) {
        Ok(value) => value,
        Err(err) => {
            let path = err.path().to_string();
            return Err(classify(err.into_inner(), &path, body));
        }
    };

    // A conforming body holds a single JSON value; anything after it is an
    // error, not ignorable garbage.
    if de.end().is_err() {
        return Err(BodyError::MultipleValues);
    }
    Ok(value)
}

fn classify(err: serde_json::Error, path: &str, body: &[u8]) -> BodyError {
    match err.classify() {
        Category::Eof => BodyError::UnexpectedEof,
        Category::Syntax => BodyError::Syntax {
            offset: byte_offset(body, err.line(), err.column()),
        },
        Category::Data => {
            if let Some(field) = unknown_field_name(&err) {
                BodyError::UnknownField { field }
            } else if !path.is_empty() && path != "." {
                BodyError::FieldType {
                    field: path.to_string(),
                }
            } else {
                BodyError::TypeAt {
                    offset: byte_offset(body, err.line(), err.column()),
                }
            }
        }
        Category::Io => BodyError::Other(err.to_string()),
    }
}

/// serde does not expose the rejected key structurally; it only appears in
/// the message as "unknown field `<name>`, ...". Recover it here so callers
/// get a structured variant instead of doing their own prefix matching.
fn unknown_field_name(err: &serde_json::Error) -> Option<String> {
    let msg = err.to_string();
    let rest = msg.strip_prefix("unknown field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// Convert serde_json's 1-based line/column into a 1-based byte offset into
/// the body, matching the character positions reported to clients.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let skipped: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    skipped + column
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Input {
        title: String,
        #[allow(dead_code)]
        year: Option<i32>,
    }

    #[test]
    fn decodes_well_formed_body() {
        let input: Input = from_slice(br#"{"title": "Moana", "year": 2016}"#).unwrap();
        assert_eq!(input.title, "Moana");
    }

    #[test]
    fn empty_body_is_distinct() {
        assert!(matches!(from_slice::<Input>(b""), Err(BodyError::Empty)));
        assert!(matches!(from_slice::<Input>(b"  \n "), Err(BodyError::Empty)));
    }

    #[test]
    fn syntax_error_reports_offset() {
        match from_slice::<Input>(b"{\"title\": \"a\",}") {
            Err(BodyError::Syntax { offset }) => assert!(offset > 0),
            other => panic!("expected syntax error, got {:?}", other.err()),
        }
    }

    #[test]
    fn truncated_body_is_badly_formed() {
        assert!(matches!(
            from_slice::<Input>(b"{\"title\": \"a\""),
            Err(BodyError::UnexpectedEof)
        ));
    }

    #[test]
    fn type_mismatch_names_the_field() {
        match from_slice::<Input>(br#"{"title": 123}"#) {
            Err(BodyError::FieldType { field }) => assert_eq!(field, "title"),
            other => panic!("expected field type error, got {:?}", other.err()),
        }
    }

    #[test]
    fn unknown_field_names_the_key() {
        match from_slice::<Input>(br#"{"title": "a", "foo": 1}"#) {
            Err(BodyError::UnknownField { field }) => assert_eq!(field, "foo"),
            other => panic!("expected unknown field error, got {:?}", other.err()),
        }
    }

    #[test]
    fn trailing_value_is_rejected() {
        assert!(matches!(
            from_slice::<Input>(br#"{"title":"a"}{"title":"b"}"#),
            Err(BodyError::MultipleValues)
        ));
    }

    #[test]
    fn oversized_body_reports_limit() {
        let body = vec![b' '; MAX_BODY_BYTES + 1];
        match from_slice::<Input>(&body) {
            Err(BodyError::TooLarge { limit }) => assert_eq!(limit, MAX_BODY_BYTES),
            other => panic!("expected too-large error, got {:?}", other.err()),
        }
    }
}
