//! HTTP handlers for the movie resource and the healthcheck.

pub mod health;
pub mod movies;
