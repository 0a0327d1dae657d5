pub mod error;
pub mod types;

pub use error::{Result, VimeoError};
pub use types::{SearchPage, VideoMetadata};

use tracing::debug;
use types::SearchResponse;

const BASE_URL: &str = "https://api.vimeo.com";
const ACCEPT_HEADER: &str = "application/vnd.vimeo.*+json;version=3.4";

pub struct VimeoClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl VimeoClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Search videos, one page per call. Restricted to Creative Commons
    /// content, sorted by relevance.
    pub async fn search(&self, query: &str, per_page: u32, page: u32) -> Result<SearchPage> {
        let url = format!("{}/videos", self.base_url);

        debug!(query, per_page, page, "Vimeo search request");

        let per_page = per_page.to_string();
        let page = page.to_string();
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
                ("sort", "relevant"),
                ("filter", "CC"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VimeoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let search: SearchResponse = resp.json().await?;
        let has_next = search.paging.next.is_some();
        let videos = search.data.into_iter().map(Into::into).collect();

        Ok(SearchPage { videos, has_next })
    }
}
