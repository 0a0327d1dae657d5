use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reelscout::classifier::ClaudeFilmClassifier;
use reelscout::export;
use reelscout::pipeline::Pipeline;
use reelscout::queries;
use reelscout_common::Config;
use tmdb_client::TmdbClient;
use vimeo_client::VimeoClient;

/// Find genuine pre-1965 feature films on Vimeo.
#[derive(Debug, Parser)]
#[command(name = "reelscout")]
struct Args {
    /// File with one search query per line, replacing the built-in list
    #[arg(long)]
    queries: Option<PathBuf>,

    /// Output directory for the CSV/JSON exports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Results to request per search query
    #[arg(long)]
    per_query: Option<u32>,

    /// Skip the content-type classification pass (input already screened)
    #[arg(long)]
    skip_content_stage: bool,

    /// Skip the feature-film verification pass (input already verified)
    #[arg(long)]
    skip_narrative_stage: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reelscout=info".parse()?))
        .init();

    let args = Args::parse();

    info!("Reelscout starting...");

    // Credentials are resolved here, before any stage runs; a missing one
    // aborts the process with the variable name.
    let mut config = Config::from_env();
    if let Some(per_query) = args.per_query {
        config.per_query_results = per_query;
    }
    if let Some(ref dir) = args.output_dir {
        config.output_dir = dir.display().to_string();
    }
    config.log_redacted();

    let custom_queries = match args.queries {
        Some(ref path) => Some(load_queries(path)?),
        None => None,
    };
    let query_refs: Vec<&str> = match custom_queries {
        Some(ref lines) => lines.iter().map(|s| s.as_str()).collect(),
        None => queries::SEARCH_QUERIES.to_vec(),
    };

    let searcher = VimeoClient::new(&config.vimeo_access_token);
    let classifier = ClaudeFilmClassifier::new(&config.anthropic_api_key, &config.claude_model);
    let index = TmdbClient::new(&config.tmdb_api_key);

    let mut pipeline = Pipeline::new(&searcher, &classifier, &index, &config, &query_refs);
    pipeline.skip_content_stage = args.skip_content_stage;
    pipeline.skip_narrative_stage = args.skip_narrative_stage;

    let (candidates, stats) = pipeline.run().await;
    info!("{stats}");

    if candidates.is_empty() {
        info!("No verified classic movies found; nothing to export");
        return Ok(());
    }

    let (csv_path, json_path) = export::export(&candidates, Path::new(&config.output_dir))?;
    info!(csv = %csv_path.display(), json = %json_path.display(), "Results written");

    for (i, movie) in candidates.iter().take(5).enumerate() {
        info!(
            rank = i + 1,
            title = movie.title.as_str(),
            score = movie.final_score.unwrap_or(0.0),
            era = movie.era.as_ref().map(|e| e.era.as_str()).unwrap_or("unknown"),
            "Top result"
        );
    }

    Ok(())
}

fn load_queries(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read queries file {}", path.display()))?;
    let queries: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    anyhow::ensure!(!queries.is_empty(), "Queries file {} is empty", path.display());
    Ok(queries)
}
