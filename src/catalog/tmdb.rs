use reqwest::{Client, Response};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

use super::CatalogError;
use crate::models::{Country, Genre, MovieDetails, MovieId, MovieSummary};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w185";

/// Poster URL for a catalog `poster_path` (paths come back with a leading
/// slash).
pub fn poster_url(poster_path: &str) -> String {
    format!("{TMDB_IMAGE_BASE}{poster_path}")
}

/// TMDB client. Genre and country lists are fetched at most once per
/// session and served from memory afterwards.
pub struct TmdbCatalog {
    api_key: String,
    language: String,
    client: Client,
    genre_cache: Mutex<Option<HashMap<u64, String>>>,
    country_cache: Mutex<Option<Vec<Country>>>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    results: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
struct GenreList {
    genres: Vec<Genre>,
}

impl TmdbCatalog {
    pub fn new(api_key: String, language: String) -> Self {
        Self {
            api_key,
            language,
            client: Client::new(),
            genre_cache: Mutex::new(None),
            country_cache: Mutex::new(None),
        }
    }

    /// Searches the catalog. An all-digit query is treated as an exact id
    /// lookup and wrapped as a single-row result; an id that does not
    /// exist comes back as an empty list.
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        if is_id_query(query) {
            let Ok(id) = query.parse::<MovieId>() else {
                return Ok(Vec::new());
            };
            return match self.movie(id).await {
                Ok(details) => Ok(vec![details.into()]),
                Err(CatalogError::NotFound) => Ok(Vec::new()),
                Err(e) => Err(e),
            };
        }

        let url = format!("{}/search/movie", TMDB_API_BASE);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(response)?;

        let page: SearchPage = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        log::info!(
            "Catalog search for '{}' returned {} results",
            query,
            page.results.len()
        );
        Ok(page.results)
    }

    /// Full catalog record for one movie id.
    pub async fn movie(&self, id: MovieId) -> Result<MovieDetails, CatalogError> {
        let url = format!("{}/movie/{}", TMDB_API_BASE, id);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(response)?;

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Genre id to display name map.
    pub async fn genres(&self) -> Result<HashMap<u64, String>, CatalogError> {
        {
            let cache = self.genre_cache.lock().unwrap();
            if let Some(map) = cache.as_ref() {
                return Ok(map.clone());
            }
        }

        let url = format!("{}/genre/movie/list", TMDB_API_BASE);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(response)?;

        let list: GenreList = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        let map: HashMap<u64, String> = list.genres.into_iter().map(|g| (g.id, g.name)).collect();
        log::info!("Loaded {} catalog genres", map.len());

        *self.genre_cache.lock().unwrap() = Some(map.clone());
        Ok(map)
    }

    /// Country list used to resolve `origin_country` codes.
    pub async fn countries(&self) -> Result<Vec<Country>, CatalogError> {
        {
            let cache = self.country_cache.lock().unwrap();
            if let Some(list) = cache.as_ref() {
                return Ok(list.clone());
            }
        }

        let url = format!("{}/configuration/countries", TMDB_API_BASE);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;
        let response = check_status(response)?;

        let list: Vec<Country> = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        log::info!("Loaded {} catalog countries", list.len());

        *self.country_cache.lock().unwrap() = Some(list.clone());
        Ok(list)
    }
}

fn is_id_query(query: &str) -> bool {
    !query.is_empty() && query.chars().all(|c| c.is_ascii_digit())
}

fn check_status(response: Response) -> Result<Response, CatalogError> {
    if response.status() == 401 {
        return Err(CatalogError::InvalidApiKey);
    }
    if response.status() == 429 {
        return Err(CatalogError::RateLimited);
    }
    if response.status() == 404 {
        return Err(CatalogError::NotFound);
    }
    if !response.status().is_success() {
        return Err(CatalogError::Api(response.status()));
    }
    Ok(response)
}
