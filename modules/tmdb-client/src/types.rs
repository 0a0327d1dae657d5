use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

/// Search-result row: enough to pick a best match by title.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: String,
}

/// Full movie record.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: String,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCompany {
    #[serde(default)]
    pub name: String,
}

impl MovieDetails {
    /// Release year parsed from the leading `YYYY` of `release_date`.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.get(..4).and_then(|y| y.parse().ok())
    }
}
