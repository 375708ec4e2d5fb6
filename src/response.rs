//! Response envelope and JSON writer.

use crate::error::AppError;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Uniform single-key wrapper for every response body, e.g. `{"movie": ...}`
/// or `{"movies": [...], "metadata": {...}}`. Payload shapes vary per
/// endpoint, so values stay dynamically typed.
#[derive(Debug, Default, Serialize)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` into the envelope under `key`. Failures surface
    /// here, before any response bytes exist.
    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), AppError> {
        self.0.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn insert_value(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }
}

/// Serialize the envelope (trailing newline included), merge any caller
/// headers, and set the JSON content type. Nothing is written until
/// serialization has fully succeeded.
pub fn write_json(
    status: StatusCode,
    envelope: Envelope,
    headers: Option<HeaderMap>,
) -> Result<Response, AppError> {
    let mut buf = serde_json::to_vec(&envelope)?;
    buf.push(b'\n');

    let mut response = Response::new(Body::from(buf));
    *response.status_mut() = status;
    if let Some(extra) = headers {
        for (name, value) in extra.iter() {
            response.headers_mut().append(name, value.clone());
        }
    }
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn writes_envelope_with_trailing_newline() {
        let mut env = Envelope::new();
        env.insert("message", &"ok").unwrap();
        let response = write_json(StatusCode::OK, env, None).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_string(response).await, "{\"message\":\"ok\"}\n");
    }

    #[tokio::test]
    async fn merges_caller_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("/v1/movies/7"));
        let response = write_json(StatusCode::CREATED, Envelope::new(), Some(headers)).unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/v1/movies/7");
        assert_eq!(body_string(response).await, "{}\n");
    }

    #[test]
    fn absent_header_map_is_a_noop() {
        let response = write_json(StatusCode::OK, Envelope::new(), None).unwrap();
        assert_eq!(response.headers().len(), 1);
    }
}
