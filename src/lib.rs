//! Marquee: JSON-over-HTTP movie API.
//!
//! The interesting machinery is generic over the resource type: strict JSON
//! body decoding with a classified failure taxonomy ([`body`]), an
//! accumulating validator ([`validator`]), typed query-string readers
//! ([`query`]), safelisted sorting with pagination metadata ([`filters`]),
//! and the envelope response writer ([`response`]). The movie handlers and
//! store are the first consumer of that machinery.

pub mod body;
pub mod config;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
pub mod validator;

pub use config::Config;
pub use error::{AppError, ConfigError};
pub use filters::{Filters, Metadata};
pub use response::{write_json, Envelope};
pub use routes::router;
pub use state::AppState;
pub use store::{Movie, MovieStore};
pub use validator::Validator;
