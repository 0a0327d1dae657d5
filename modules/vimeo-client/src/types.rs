use serde::{Deserialize, Serialize};

/// One page of search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub videos: Vec<VideoMetadata>,
    pub has_next: bool,
}

/// Normalized video record as the pipeline consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub url: String,
    pub description: String,
    pub duration_secs: u32,
    pub created_time: String,
    pub plays: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub author: String,
    pub author_url: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

// --- Wire types (Vimeo API v3.4) ---

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Vec<WireVideo>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Paging {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVideo {
    pub name: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub created_time: String,
    pub stats: Option<WireStats>,
    pub metadata: Option<WireMetadata>,
    pub user: Option<WireUser>,
    #[serde(default)]
    pub tags: Vec<WireTag>,
    #[serde(default)]
    pub categories: Vec<WireCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireStats {
    pub plays: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMetadata {
    pub connections: Option<WireConnections>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireConnections {
    pub likes: Option<WireTotal>,
    pub comments: Option<WireTotal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTotal {
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTag {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCategory {
    pub name: Option<String>,
}

impl From<WireVideo> for VideoMetadata {
    fn from(v: WireVideo) -> Self {
        let connections = v.metadata.and_then(|m| m.connections);
        let (likes, comments) = match connections {
            Some(c) => (
                c.likes.and_then(|t| t.total),
                c.comments.and_then(|t| t.total),
            ),
            None => (None, None),
        };
        let (author, author_url) = match v.user {
            Some(u) => (
                u.name.unwrap_or_else(|| "Unknown".to_string()),
                u.link.unwrap_or_default(),
            ),
            None => ("Unknown".to_string(), String::new()),
        };

        VideoMetadata {
            title: v.name.unwrap_or_else(|| "Untitled".to_string()),
            url: v.link.unwrap_or_default(),
            description: v.description.unwrap_or_default(),
            duration_secs: v.duration,
            created_time: v.created_time,
            plays: v.stats.and_then(|s| s.plays),
            likes,
            comments,
            author,
            author_url,
            tags: v.tags.into_iter().filter_map(|t| t.name).collect(),
            categories: v.categories.into_iter().filter_map(|c| c.name).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    pub name: Option<String>,
    pub link: Option<String>,
}
