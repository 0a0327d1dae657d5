use std::env;

use tracing::info;

/// Pipeline configuration loaded from environment variables.
///
/// Credentials are required and resolved up front, before any stage runs.
/// Tunables carry the defaults the pipeline was calibrated with.
#[derive(Debug, Clone)]
pub struct Config {
    // Credentials
    pub vimeo_access_token: String,
    pub anthropic_api_key: String,
    pub tmdb_api_key: String,

    // Classification model
    pub claude_model: String,

    // Collector
    pub min_duration_secs: u32,
    pub max_duration_secs: u32,
    pub per_query_results: u32,
    pub search_delay_ms: u64,
    pub page_delay_ms: u64,

    // Classifier
    pub content_batch_size: usize,
    pub narrative_batch_size: usize,
    pub era_batch_size: usize,
    pub classify_delay_ms: u64,

    // Cross-reference
    pub crossref_delay_ms: u64,
    pub min_crossref_confidence: f64,

    // Export
    pub output_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            vimeo_access_token: required_env("VIMEO_ACCESS_TOKEN"),
            anthropic_api_key: required_env("ANTHROPIC_API_KEY"),
            tmdb_api_key: required_env("TMDB_API_KEY"),
            claude_model: env_or("CLAUDE_MODEL", "claude-sonnet-4-20250514"),
            min_duration_secs: parsed_env("MIN_DURATION_SECS", 45 * 60),
            max_duration_secs: parsed_env("MAX_DURATION_SECS", 180 * 60),
            per_query_results: parsed_env("PER_QUERY_RESULTS", 5),
            search_delay_ms: parsed_env("SEARCH_DELAY_MS", 1000),
            page_delay_ms: parsed_env("PAGE_DELAY_MS", 500),
            content_batch_size: parsed_env("CONTENT_BATCH_SIZE", 10),
            narrative_batch_size: parsed_env("NARRATIVE_BATCH_SIZE", 8),
            era_batch_size: parsed_env("ERA_BATCH_SIZE", 8),
            classify_delay_ms: parsed_env("CLASSIFY_DELAY_MS", 1000),
            crossref_delay_ms: parsed_env("CROSSREF_DELAY_MS", 300),
            min_crossref_confidence: parsed_env("MIN_CROSSREF_CONFIDENCE", 70.0),
            output_dir: env_or("OUTPUT_DIR", "outputs"),
        }
    }

    /// Log the effective configuration without leaking credentials.
    pub fn log_redacted(&self) {
        info!(
            model = self.claude_model.as_str(),
            min_minutes = self.min_duration_secs / 60,
            max_minutes = self.max_duration_secs / 60,
            per_query = self.per_query_results,
            min_crossref_confidence = self.min_crossref_confidence,
            output_dir = self.output_dir.as_str(),
            "Configuration loaded (credentials redacted)"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid number, got '{raw}'")),
        Err(_) => default,
    }
}
