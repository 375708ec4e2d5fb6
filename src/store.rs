//! Movie model, business validation rules, and the PostgreSQL store.

use crate::error::AppError;
use crate::filters::{Filters, Metadata};
use crate::validator::{self, Validator};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Debug, Serialize)]
pub struct Movie {
    pub id: i64,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
    pub version: i32,
}

/// All checks run; the validator collects every violation.
pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= 500,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= 1888, "year", "must be greater than 1888");
    v.check(
        movie.year <= Utc::now().year(),
        "year",
        "must not be in the future",
    );

    v.check(movie.runtime != 0, "runtime", "must be provided");
    v.check(movie.runtime > 0, "runtime", "must be a positive integer");

    v.check(
        !movie.genres.is_empty(),
        "genres",
        "must contain at least 1 genre",
    );
    v.check(
        movie.genres.len() <= 5,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        validator::unique(&movie.genres),
        "genres",
        "must not contain duplicate values",
    );
}

#[derive(Clone)]
pub struct MovieStore {
    pool: PgPool,
}

impl MovieStore {
    pub fn new(pool: PgPool) -> Self {
        MovieStore { pool }
    }

    /// Fetch one page of movies matching the title/genre criteria, plus the
    /// total match count via a window function so pagination metadata costs
    /// no second query.
    pub async fn get_all(
        &self,
        title: &str,
        genres: &[String],
        filters: &Filters,
    ) -> Result<(Vec<Movie>, Metadata), AppError> {
        // sort_column is restricted to the safelist; it is the only
        // interpolated identifier, everything else is a bound parameter.
        let sql = format!(
            "SELECT count(*) OVER(), id, created_at, title, year, runtime, genres, version \
             FROM movies \
             WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '') \
             AND (genres @> $2 OR $2 = '{{}}') \
             ORDER BY {} {}, id ASC \
             LIMIT $3 OFFSET $4",
            filters.sort_column(),
            filters.sort_direction(),
        );
        tracing::debug!(sql = %sql, title = %title, "list movies");

        let rows = sqlx::query(&sql)
            .bind(title)
            .bind(genres)
            .bind(filters.limit())
            .bind(filters.offset())
            .fetch_all(&self.pool)
            .await?;

        let mut total_records = 0i64;
        let mut movies = Vec::with_capacity(rows.len());
        for row in &rows {
            total_records = row.try_get(0)?;
            movies.push(row_to_movie(row)?);
        }
        let metadata = Metadata::calculate(total_records, filters.page, filters.page_size);
        Ok((movies, metadata))
    }

    pub async fn get(&self, id: i64) -> Result<Movie, AppError> {
        let row = sqlx::query(
            "SELECT id, created_at, title, year, runtime, genres, version \
             FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row_to_movie(&row)?),
            None => Err(AppError::NotFound),
        }
    }

    /// Insert a movie, filling the system-generated fields from RETURNING.
    pub async fn insert(&self, movie: &mut Movie) -> Result<(), AppError> {
        let row = sqlx::query(
            "INSERT INTO movies (title, year, runtime, genres) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, created_at, version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime)
        .bind(&movie.genres)
        .fetch_one(&self.pool)
        .await?;
        movie.id = row.try_get("id")?;
        movie.created_at = row.try_get("created_at")?;
        movie.version = row.try_get("version")?;
        Ok(())
    }

    /// Update with an optimistic-concurrency check: the stored version must
    /// still match the one the client read, otherwise the row was changed
    /// underneath them and the update is a conflict.
    pub async fn update(&self, movie: &mut Movie) -> Result<(), AppError> {
        let row = sqlx::query(
            "UPDATE movies \
             SET title = $1, year = $2, runtime = $3, genres = $4, version = version + 1 \
             WHERE id = $5 AND version = $6 \
             RETURNING version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime)
        .bind(&movie.genres)
        .bind(movie.id)
        .bind(movie.version)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => {
                movie.version = row.try_get("version")?;
                Ok(())
            }
            None => Err(AppError::EditConflict),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Create the movies table when it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS movies (\
            id bigserial PRIMARY KEY, \
            created_at timestamptz NOT NULL DEFAULT now(), \
            title text NOT NULL, \
            year integer NOT NULL, \
            runtime integer NOT NULL, \
            genres text[] NOT NULL, \
            version integer NOT NULL DEFAULT 1\
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

fn row_to_movie(row: &PgRow) -> Result<Movie, sqlx::Error> {
    Ok(Movie {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        title: row.try_get("title")?,
        year: row.try_get("year")?,
        runtime: row.try_get("runtime")?,
        genres: row.try_get("genres")?,
        version: row.try_get("version")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> Movie {
        Movie {
            id: 0,
            created_at: Utc::now(),
            title: "Casablanca".to_string(),
            year: 1942,
            runtime: 102,
            genres: vec!["drama".to_string(), "romance".to_string()],
            version: 1,
        }
    }

    #[test]
    fn valid_movie_passes() {
        let mut v = Validator::new();
        validate_movie(&mut v, &sample_movie());
        assert!(v.valid());
    }

    #[test]
    fn every_violation_is_collected() {
        let movie = Movie {
            title: String::new(),
            year: 0,
            runtime: -10,
            genres: vec!["drama".to_string(), "drama".to_string()],
            ..sample_movie()
        };
        let mut v = Validator::new();
        validate_movie(&mut v, &movie);
        let errors = v.into_errors();
        assert_eq!(errors.len(), 4);
        for key in ["title", "year", "runtime", "genres"] {
            assert!(errors.contains_key(key), "missing error for {key}");
        }
    }

    #[test]
    fn year_bounds_are_enforced() {
        let mut movie = sample_movie();
        movie.year = 1800;
        let mut v = Validator::new();
        validate_movie(&mut v, &movie);
        assert_eq!(
            v.into_errors().get("year").map(String::as_str),
            Some("must be greater than 1888")
        );

        movie.year = Utc::now().year() + 1;
        let mut v = Validator::new();
        validate_movie(&mut v, &movie);
        assert_eq!(
            v.into_errors().get("year").map(String::as_str),
            Some("must not be in the future")
        );
    }

    #[test]
    fn serialized_movie_hides_created_at() {
        let value = serde_json::to_value(sample_movie()).unwrap();
        assert!(value.get("created_at").is_none());
        assert_eq!(value["title"], "Casablanca");
        assert_eq!(value["version"], 1);
    }
}
