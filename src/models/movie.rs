use serde::{Deserialize, Serialize};

pub type MovieId = u64;

/// One result row from a catalog search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub origin_country: Option<Vec<String>>,
}

/// Full catalog record for one movie id. Genres come back name-resolved
/// here, unlike search results which carry bare genre ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub origin_country: Option<Vec<String>>,
}

impl From<MovieDetails> for MovieSummary {
    fn from(details: MovieDetails) -> Self {
        Self {
            id: details.id,
            title: details.title,
            poster_path: details.poster_path,
            genre_ids: details.genres.iter().map(|g| g.id).collect(),
            release_date: details.release_date,
            overview: details.overview,
            origin_country: details.origin_country,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub iso_3166_1: String,
    pub english_name: String,
    #[serde(default)]
    pub native_name: Option<String>,
}
