//! Movie catalog lookups against the TMDB HTTP API.

mod tmdb;

pub use tmdb::{poster_url, TmdbCatalog};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limited by the catalog")]
    RateLimited,

    #[error("Not found in the catalog")]
    NotFound,

    #[error("Catalog API returned status: {0}")]
    Api(reqwest::StatusCode),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}
