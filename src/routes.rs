//! Router construction.

use crate::body::MAX_BODY_BYTES;
use crate::error::AppError;
use crate::handlers::{health, movies};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/healthcheck", get(health::healthcheck))
        .route("/v1/movies", get(movies::list).post(movies::create))
        .route(
            "/v1/movies/:id",
            get(movies::show)
                .patch(movies::update)
                .delete(movies::delete),
        )
        .fallback(not_found)
        // One byte above the decode layer's limit, so a body of exactly
        // MAX_BODY_BYTES + 1 still reaches the decoder and gets the
        // taxonomy's too-large message.
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES + 1))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
