//! Shared application state for all routes.

use crate::config::Config;
use crate::store::MovieStore;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub movies: MovieStore,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        AppState {
            config,
            movies: MovieStore::new(pool),
        }
    }
}
