use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use reelscout_common::Candidate;

/// One flat CSV row per candidate: scalar fields plus joined text for the
/// list fields. The JSON export alongside keeps the full nested record.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    title: &'a str,
    url: &'a str,
    duration_minutes: u32,
    duration_formatted: String,

    estimated_production_year: Option<i32>,
    estimated_era: &'a str,
    genre: &'a str,
    production_company: &'a str,
    is_formal_studio: bool,
    ai_quality_score: u8,

    tmdb_verified: bool,
    tmdb_id: Option<u64>,
    tmdb_title: &'a str,
    tmdb_release_year: Option<i32>,
    tmdb_runtime_minutes: Option<u32>,
    tmdb_studios: String,
    tmdb_confidence: f64,

    views: u64,
    likes: u64,
    comments: u64,
    created_date: &'a str,
    user: &'a str,
    user_url: &'a str,
    tags: String,
    categories: String,

    final_score: f64,

    description: String,
}

impl<'a> From<&'a Candidate> for ExportRow<'a> {
    fn from(c: &'a Candidate) -> Self {
        let era = c.era.as_ref();
        let crossref = c.crossref.as_ref();

        ExportRow {
            title: &c.title,
            url: &c.url,
            duration_minutes: c.duration_minutes(),
            duration_formatted: c.duration_formatted(),
            estimated_production_year: era.and_then(|e| e.production_year),
            estimated_era: era.map(|e| e.era.as_str()).unwrap_or(""),
            genre: era.map(|e| e.genre.as_str()).unwrap_or(""),
            production_company: era
                .and_then(|e| e.production_company.as_deref())
                .unwrap_or(""),
            is_formal_studio: era.map(|e| e.is_formal_studio).unwrap_or(false),
            ai_quality_score: era.map(|e| e.quality_score).unwrap_or(0),
            tmdb_verified: crossref.map(|x| x.verified).unwrap_or(false),
            tmdb_id: crossref.and_then(|x| x.tmdb_id),
            tmdb_title: crossref.map(|x| x.tmdb_title.as_str()).unwrap_or(""),
            tmdb_release_year: crossref.and_then(|x| x.release_year),
            tmdb_runtime_minutes: crossref.and_then(|x| x.runtime_minutes),
            tmdb_studios: crossref.map(|x| x.studios.join(", ")).unwrap_or_default(),
            tmdb_confidence: crossref.map(|x| x.confidence).unwrap_or(0.0),
            views: c.plays.unwrap_or(0),
            likes: c.likes.unwrap_or(0),
            comments: c.comments.unwrap_or(0),
            created_date: &c.created_time,
            user: &c.author,
            user_url: &c.author_url,
            tags: c.tags.join(", "),
            categories: c.categories.join(", "),
            final_score: c.final_score.unwrap_or(0.0),
            // Truncated for spreadsheet use; the JSON export has it whole.
            description: c.description.chars().take(500).collect(),
        }
    }
}

/// Write the ranked list to timestamped CSV and JSON files under
/// `output_dir`, creating the directory if needed. Returns both paths.
pub fn export(candidates: &[Candidate], output_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output dir {}", output_dir.display()))?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let csv_path = output_dir.join(format!("verified_classic_movies_{timestamp}.csv"));
    let json_path = output_dir.join(format!("verified_classic_movies_{timestamp}.json"));

    write_csv(candidates, &csv_path)?;
    write_json(candidates, &json_path)?;

    info!(
        count = candidates.len(),
        csv = %csv_path.display(),
        json = %json_path.display(),
        "Export complete"
    );

    Ok((csv_path, json_path))
}

fn write_csv(candidates: &[Candidate], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    for candidate in candidates {
        writer.serialize(ExportRow::from(candidate))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(candidates: &[Candidate], path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, candidates)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelscout_common::{CrossRef, EraVerdict};

    fn candidate() -> Candidate {
        Candidate {
            url: "https://vimeo.com/123".into(),
            title: "Casablanca (1942) - Full Movie".into(),
            description: "Warner Bros. classic, \"wartime\" drama".into(),
            duration_secs: 6120,
            created_time: "2019-03-01T00:00:00+00:00".into(),
            plays: Some(150_000),
            likes: Some(900),
            comments: None,
            author: "Classic Films Archive".into(),
            author_url: "https://vimeo.com/classics".into(),
            tags: vec!["classic".into(), "drama".into()],
            categories: vec![],
            content: None,
            narrative: None,
            era: Some(EraVerdict {
                production_year: Some(1942),
                era: "1940s".into(),
                is_pre_1965: true,
                production_company: Some("Warner Bros.".into()),
                is_formal_studio: true,
                genre: "drama".into(),
                quality_score: 9,
                reasoning: String::new(),
            }),
            crossref: Some(CrossRef {
                verified: true,
                confidence: 100.0,
                tmdb_id: Some(289),
                tmdb_title: "Casablanca".into(),
                release_year: Some(1942),
                is_pre_1965: true,
                studios: vec!["Warner Bros.".into()],
                is_classic_studio: true,
                runtime_minutes: Some(102),
                runtime_match: true,
                title_similarity: 0.93,
                match_reason: "Verified classic movie: pre-1965 from Warner Bros.".into(),
            }),
            final_score: Some(93.0),
        }
    }

    #[test]
    fn export_writes_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec![candidate()];

        let (csv_path, json_path) = export(&candidates, dir.path()).unwrap();

        let csv_text = fs::read_to_string(&csv_path).unwrap();
        let mut lines = csv_text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("title,url,duration_minutes"));
        assert!(header.contains("tmdb_confidence"));
        assert!(header.contains("final_score"));
        assert_eq!(lines.count(), 1);
        assert!(csv_text.contains("https://vimeo.com/123"));

        let json_text = fs::read_to_string(&json_path).unwrap();
        let parsed: Vec<Candidate> = serde_json::from_str(&json_text).unwrap();
        assert_eq!(parsed.len(), 1);
        // Lossless: nested blocks survive the round trip.
        assert_eq!(parsed[0].crossref.as_ref().unwrap().tmdb_id, Some(289));
        assert_eq!(parsed[0].description, candidates[0].description);
    }

    #[test]
    fn rows_without_stage_blocks_export_defaults() {
        let mut bare = candidate();
        bare.era = None;
        bare.crossref = None;
        bare.final_score = None;

        let row = ExportRow::from(&bare);
        assert_eq!(row.ai_quality_score, 0);
        assert!(!row.tmdb_verified);
        assert_eq!(row.tmdb_confidence, 0.0);
        assert_eq!(row.final_score, 0.0);
        assert_eq!(row.estimated_era, "");
    }
}
