//! Healthcheck handler.

use crate::error::AppError;
use crate::response::{write_json, Envelope};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};
use serde_json::json;

pub async fn healthcheck(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut envelope = Envelope::new();
    envelope.insert("status", &"available")?;
    envelope.insert(
        "system_info",
        &json!({
            "environment": state.config.env,
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )?;
    write_json(StatusCode::OK, envelope, None)
}
