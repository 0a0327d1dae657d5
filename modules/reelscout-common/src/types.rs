use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Content classification ---

/// Closed content-type set for the first classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    Movie,
    Trailer,
    Review,
    Promo,
    Test,
    Essay,
    Other,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Movie => write!(f, "MOVIE"),
            ContentType::Trailer => write!(f, "TRAILER"),
            ContentType::Review => write!(f, "REVIEW"),
            ContentType::Promo => write!(f, "PROMO"),
            ContentType::Test => write!(f, "TEST"),
            ContentType::Essay => write!(f, "ESSAY"),
            ContentType::Other => write!(f, "OTHER"),
        }
    }
}

/// Content-type pass verdict. Reasoning is retained for audit only and is
/// never parsed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentVerdict {
    pub content_type: ContentType,
    pub confidence: f64,
    pub reasoning: String,
}

/// Feature-film verification verdict.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NarrativeVerdict {
    pub is_feature_film: bool,
    pub has_narrative: bool,
    pub confidence: f64,
    pub reasoning: String,
}

/// Era and studio verdict.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EraVerdict {
    pub production_year: Option<i32>,
    /// Decade label, e.g. "1940s" or "modern".
    pub era: String,
    pub is_pre_1965: bool,
    pub production_company: Option<String>,
    pub is_formal_studio: bool,
    pub genre: String,
    /// Overall classic-authenticity score, 1-10.
    pub quality_score: u8,
    pub reasoning: String,
}

// --- Cross-reference verification ---

/// Result of matching a candidate against the title database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossRef {
    pub verified: bool,
    /// 0-100.
    pub confidence: f64,
    pub tmdb_id: Option<u64>,
    pub tmdb_title: String,
    pub release_year: Option<i32>,
    pub is_pre_1965: bool,
    pub studios: Vec<String>,
    pub is_classic_studio: bool,
    pub runtime_minutes: Option<u32>,
    pub runtime_match: bool,
    pub title_similarity: f64,
    pub match_reason: String,
}

// --- Candidate ---

/// A video record moving through the pipeline. Identity is the canonical
/// URL. Stage blocks are `Some` only once their producing stage has run;
/// a candidate dropped before a stage never carries that stage's block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Seconds; 0 means unknown.
    pub duration_secs: u32,
    /// Upload timestamp, kept opaque.
    pub created_time: String,
    pub plays: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub author: String,
    pub author_url: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<NarrativeVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<EraVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossref: Option<CrossRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
}

impl Candidate {
    /// Duration in whole minutes (floor).
    pub fn duration_minutes(&self) -> u32 {
        self.duration_secs / 60
    }

    /// Duration formatted as HH:MM:SS (or MM:SS under an hour).
    pub fn duration_formatted(&self) -> String {
        let hours = self.duration_secs / 3600;
        let minutes = (self.duration_secs % 3600) / 60;
        let secs = self.duration_secs % 60;
        if hours > 0 {
            format!("{hours:02}:{minutes:02}:{secs:02}")
        } else {
            format!("{minutes:02}:{secs:02}")
        }
    }
}
