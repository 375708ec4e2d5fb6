//! Typed errors and HTTP mapping.

use crate::body::BodyError;
use crate::response::{write_json, Envelope};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

const GENERIC_SERVER_ERROR: &str =
    "the server encountered a problem and could not process your request";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Body(#[from] BodyError),
    #[error("the requested resource could not be found")]
    NotFound,
    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,
    #[error("validation failed")]
    Validation(HashMap<String, String>),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Body(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::EditConflict => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Db(_) | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            // Field-level failures go out as a map so one round trip shows
            // every problem.
            AppError::Validation(errors) => Value::Object(
                errors
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ),
            AppError::Db(err) => {
                tracing::error!(error = %err, "database failure");
                Value::String(GENERIC_SERVER_ERROR.to_string())
            }
            AppError::Serialization(err) => {
                tracing::error!(error = %err, "response serialization failure");
                Value::String(GENERIC_SERVER_ERROR.to_string())
            }
            other => Value::String(other.to_string()),
        };

        let mut envelope = Envelope::new();
        envelope.insert_value("error", detail);
        match write_json(status, envelope, None) {
            Ok(response) => response,
            // Writing the error body itself failed; send a bare 500.
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
