use anyhow::{Context, Result};
use async_trait::async_trait;

use reelscout_common::{Candidate, ContentVerdict, EraVerdict, NarrativeVerdict};
use tmdb_client::TmdbClient;
use vimeo_client::{SearchPage, VimeoClient};

// --- VideoSearcher trait ---

/// Video-search collaborator: one page of results per call.
#[async_trait]
pub trait VideoSearcher: Send + Sync {
    async fn search(&self, query: &str, page_size: u32, page: u32) -> Result<SearchPage>;
}

#[async_trait]
impl VideoSearcher for VimeoClient {
    async fn search(&self, query: &str, page_size: u32, page: u32) -> Result<SearchPage> {
        VimeoClient::search(self, query, page_size, page)
            .await
            .with_context(|| format!("Vimeo search failed for '{query}' page {page}"))
    }
}

// --- FilmClassifier trait ---

/// Classification collaborator. Each call covers one batch and must return
/// exactly one verdict per input, in input order; anything else is treated
/// by the caller as a failed batch.
#[async_trait]
pub trait FilmClassifier: Send + Sync {
    async fn classify_content(&self, batch: &[Candidate]) -> Result<Vec<ContentVerdict>>;
    async fn verify_narrative(&self, batch: &[Candidate]) -> Result<Vec<NarrativeVerdict>>;
    async fn verify_era(&self, batch: &[Candidate]) -> Result<Vec<EraVerdict>>;
}

// --- TitleIndex trait ---

/// A title-search row from the authoritative database.
#[derive(Debug, Clone)]
pub struct TitleMatch {
    pub id: u64,
    pub title: String,
}

/// Full record for an accepted title match.
#[derive(Debug, Clone)]
pub struct TitleRecord {
    pub title: String,
    pub release_year: Option<i32>,
    pub runtime_minutes: Option<u32>,
    pub production_companies: Vec<String>,
}

/// Authoritative-title-database collaborator.
#[async_trait]
pub trait TitleIndex: Send + Sync {
    async fn search_title(&self, title: &str, year_hint: Option<i32>) -> Result<Vec<TitleMatch>>;
    async fn title_details(&self, id: u64) -> Result<TitleRecord>;
}

#[async_trait]
impl TitleIndex for TmdbClient {
    async fn search_title(&self, title: &str, year_hint: Option<i32>) -> Result<Vec<TitleMatch>> {
        let results = self
            .search_movie(title, year_hint)
            .await
            .with_context(|| format!("TMDb search failed for '{title}'"))?;
        Ok(results
            .into_iter()
            .map(|m| TitleMatch {
                id: m.id,
                title: m.title,
            })
            .collect())
    }

    async fn title_details(&self, id: u64) -> Result<TitleRecord> {
        let details = self
            .movie_details(id)
            .await
            .with_context(|| format!("TMDb details failed for id {id}"))?;
        let release_year = details.release_year();
        Ok(TitleRecord {
            title: details.title,
            release_year,
            runtime_minutes: details.runtime,
            production_companies: details
                .production_companies
                .into_iter()
                .map(|c| c.name)
                .collect(),
        })
    }
}
