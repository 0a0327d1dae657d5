pub mod error;
pub mod types;

pub use error::{Result, TmdbError};
pub use types::{MovieDetails, MovieSummary, ProductionCompany};

use tracing::debug;
use types::SearchResponse;

const BASE_URL: &str = "https://api.themoviedb.org/3";

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    /// v4 read access tokens are JWTs sent as a bearer header; v3 keys go
    /// in the query string.
    use_bearer: bool,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let use_bearer = api_key.starts_with("eyJ");
        Self {
            client: reqwest::Client::new(),
            api_key,
            use_bearer,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let req = self.client.get(url);
        if self.use_bearer {
            req.bearer_auth(&self.api_key)
        } else {
            req.query(&[("api_key", self.api_key.as_str())])
        }
    }

    /// Search movies by title, optionally narrowed to a release year.
    pub async fn search_movie(&self, title: &str, year: Option<i32>) -> Result<Vec<MovieSummary>> {
        let url = format!("{}/search/movie", self.base_url);

        debug!(title, ?year, "TMDb movie search");

        let mut req = self
            .get(&url)
            .query(&[("query", title), ("include_adult", "false")]);
        if let Some(year) = year {
            req = req.query(&[("year", &year.to_string())]);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TmdbError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let search: SearchResponse = resp.json().await?;
        Ok(search.results)
    }

    /// Fetch full details (runtime, production companies) for a movie id.
    pub async fn movie_details(&self, tmdb_id: u64) -> Result<MovieDetails> {
        let url = format!("{}/movie/{}", self.base_url, tmdb_id);

        debug!(tmdb_id, "TMDb movie details");

        let resp = self.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TmdbError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}
