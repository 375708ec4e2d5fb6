//! Movie CRUD handlers: create, show, update, delete, list.

use crate::body;
use crate::error::AppError;
use crate::filters::Filters;
use crate::query;
use crate::response::{write_json, Envelope};
use crate::state::AppState;
use crate::store::{validate_movie, Movie};
use crate::validator::Validator;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

/// Sort tokens a client may request for the list endpoint. Bare names sort
/// ascending, `-`-prefixed descending.
const SORT_SAFELIST: &[&str] = &[
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

/// Ids are positive base-10 integers; anything else folds into not-found.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::NotFound),
    }
}

/// Missing fields fall back to their zero value and are caught by business
/// validation, so the client sees a field-level 422 rather than a decode 400.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CreateMovieInput {
    title: String,
    year: i32,
    runtime: i32,
    genres: Vec<String>,
}

/// Partial-update shape: an omitted (or null) field leaves the stored value
/// untouched.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateMovieInput {
    title: Option<String>,
    year: Option<i32>,
    runtime: Option<i32>,
    genres: Option<Vec<String>>,
}

pub async fn create(State(state): State<AppState>, raw: Bytes) -> Result<Response, AppError> {
    let input: CreateMovieInput = body::from_slice(&raw)?;
    let mut movie = Movie {
        id: 0,
        created_at: Utc::now(),
        title: input.title,
        year: input.year,
        runtime: input.runtime,
        genres: input.genres,
        version: 0,
    };

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    if !v.valid() {
        return Err(AppError::Validation(v.into_errors()));
    }

    state.movies.insert(&mut movie).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::try_from(format!("/v1/movies/{}", movie.id)) {
        headers.insert(header::LOCATION, location);
    }
    let mut envelope = Envelope::new();
    envelope.insert("movie", &movie)?;
    write_json(StatusCode::CREATED, envelope, Some(headers))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let movie = state.movies.get(id).await?;

    let mut envelope = Envelope::new();
    envelope.insert("movie", &movie)?;
    write_json(StatusCode::OK, envelope, None)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    raw: Bytes,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let mut movie = state.movies.get(id).await?;

    let input: UpdateMovieInput = body::from_slice(&raw)?;
    if let Some(title) = input.title {
        movie.title = title;
    }
    if let Some(year) = input.year {
        movie.year = year;
    }
    if let Some(runtime) = input.runtime {
        movie.runtime = runtime;
    }
    if let Some(genres) = input.genres {
        movie.genres = genres;
    }

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    if !v.valid() {
        return Err(AppError::Validation(v.into_errors()));
    }

    state.movies.update(&mut movie).await?;

    let mut envelope = Envelope::new();
    envelope.insert("movie", &movie)?;
    write_json(StatusCode::OK, envelope, None)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    state.movies.delete(id).await?;

    let mut envelope = Envelope::new();
    envelope.insert("message", &"movie successfully deleted")?;
    write_json(StatusCode::OK, envelope, None)
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let mut v = Validator::new();

    let title = query::read_string(&params, "title", "");
    let genres = query::read_csv(&params, "genres", Vec::new());
    let filters = Filters {
        page: query::read_int(&params, "page", 1, &mut v),
        page_size: query::read_int(&params, "page_size", 20, &mut v),
        sort: query::read_string(&params, "sort", "id"),
        sort_safelist: SORT_SAFELIST.to_vec(),
    };
    filters.validate(&mut v);
    if !v.valid() {
        return Err(AppError::Validation(v.into_errors()));
    }

    let (movies, metadata) = state.movies.get_all(&title, &genres, &filters).await?;

    let mut envelope = Envelope::new();
    envelope.insert("movies", &movies)?;
    envelope.insert("metadata", &metadata)?;
    write_json(StatusCode::OK, envelope, None)
}
