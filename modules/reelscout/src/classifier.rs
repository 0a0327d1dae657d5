use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ai_client::Claude;
use reelscout_common::{
    Candidate, Config, ContentType, ContentVerdict, EraVerdict, NarrativeVerdict,
};

use crate::pipeline::RunStats;
use crate::traits::FilmClassifier;

/// Content-type pass: reject at or below this confidence even when the
/// type comes back MOVIE.
const CONTENT_CONFIDENCE_MIN: f64 = 0.7;
/// Feature-film pass: reject at or below this narrative confidence.
const NARRATIVE_CONFIDENCE_MIN: f64 = 0.6;
/// Era pass: reject below this quality score.
const QUALITY_SCORE_MIN: u8 = 6;

// =============================================================================
// Prompts
// =============================================================================

const CONTENT_SYSTEM_PROMPT: &str = r#"You classify the content type of videos found on a video-sharing site, from their metadata alone.

For each input video choose exactly one content_type:

- **MOVIE**: A full-length feature film. Narrative story, 45+ minutes.
- **TRAILER**: A preview or teaser for a movie, typically 1-5 minutes.
- **REVIEW**: Analysis, critique, or discussion about movies.
- **PROMO**: Promotional content — channel idents, network promos, ads.
- **TEST**: Technical tests — camera, lens, VFX breakdowns.
- **ESSAY**: Video essays about film or cinema.
- **OTHER**: Anything that fits none of the above.

Red flags for NON-movies:
- Titles containing "trailer", "promo", "review", "breakdown", "test", "essay", "recap"
- Very short duration (under 20 minutes) suggests trailer or promo
- Descriptions mentioning "client:", "agency:", "director:", "shot on", "VFX"
- Uploader names that are networks or agencies suggest promos

Green flags for movies:
- Duration between 45 and 180 minutes
- Plot or story elements in the description
- Character names mentioned
- Classic movie vocabulary: "starring", "directed by", "film noir", "drama"

Set confidence between 0.0 and 1.0 for how certain you are, and give a one or two sentence reasoning for the classification.

Return exactly one verdict per input video, in the same order as the input."#;

const NARRATIVE_SYSTEM_PROMPT: &str = r#"These videos were classified as MOVIE in an initial screening. Verify whether each one is a genuine feature-length narrative film.

For each input video determine:

- is_feature_film: true only for a narrative, character-driven film of 40+ minutes with theatrical-release quality. False for documentaries about films, compilations, shorts under 40 minutes, and music videos.
- has_narrative: does it tell a story with characters and a plot, or is it experimental, abstract, or documentary material?
- confidence: 0.0-1.0 for the narrative judgment.
- reasoning: two or three sentences citing specific evidence.

Positive indicators:
- A plot summary or story synopsis in the description
- Character names (not just actor names)
- Genre keywords: drama, comedy, thriller, western, noir, horror, sci-fi
- Duration between 40 and 180 minutes
- "Starring", "directed by", "screenplay", "based on"
- Film festival mentions or theatrical release information

Negative indicators:
- "Documentary about...", "The story of how...", "Behind the scenes"
- "Supercut", "compilation", "collection", "montage", "tribute"
- Very short (under 40 minutes) or very long (over 200 minutes) duration
- "Music video", "concert film", "performance"
- Educational or instructional content
- Modern creator-style upload descriptions

Return exactly one verdict per input video, in the same order as the input."#;

const ERA_SYSTEM_PROMPT: &str = r#"These are verified feature-length narrative films. Determine each one's production era and studio authenticity.

For each input video determine:

- production_year: best estimate of the PRODUCTION year, not the upload date. Use year clues in the title and description, decade indicators ("1940s classic", "pre-code", "silent era"), and actor or director names. Null if truly uncertain.
- era: a decade label — "1900s" through "1980s", or "modern" for 1990 onward.
- is_pre_1965: true only when you are confident the film was produced before 1965. Be conservative.
- production_company: the studio or production company if one can be identified, else null. Classic studios include MGM, Paramount, Warner Bros, Universal, RKO, 20th Century Fox, Columbia, United Artists; established independents also count.
- is_formal_studio: true when the film came from a recognized studio, major or established independent. False for amateur work, modern indies, or when uncertain.
- genre: the primary genre — drama, comedy, thriller, horror, western, noir, sci-fi, romance, war, crime, musical.
- quality_score: 1-10 — how confident are you that this is a genuine classic movie worth watching? Weigh era authenticity, studio legitimacy, and genre clarity. 8-10 highly confident classic, 5-7 probable classic with some uncertainty, 1-4 uncertain or likely not a true classic.
- reasoning: two or three sentences explaining the era and studio determination.

Evidence to look for:
- A year in the title: "Nosferatu (1922)", "The 39 Steps 1935"
- Era descriptors: "silent film", "pre-code", "golden age", "classic hollywood"
- Known classic titles: Casablanca, Citizen Kane, Metropolis
- Actor names such as Chaplin, Bogart, Hepburn, Grant indicate the classic era
- Director names such as Hitchcock, Hawks, Ford, Lang, Welles
- Studio mentions in the description
- "Public domain" or "copyright expired" suggests pre-1965

Return exactly one verdict per input video, in the same order as the input."#;

// =============================================================================
// Claude-backed classifier
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ContentBatchResponse {
    #[serde(default)]
    verdicts: Vec<ContentVerdict>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct NarrativeBatchResponse {
    #[serde(default)]
    verdicts: Vec<NarrativeVerdict>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct EraBatchResponse {
    #[serde(default)]
    verdicts: Vec<EraVerdict>,
}

pub struct ClaudeFilmClassifier {
    claude: Claude,
}

impl ClaudeFilmClassifier {
    pub fn new(anthropic_api_key: &str, model: &str) -> Self {
        Self {
            claude: Claude::new(anthropic_api_key, model),
        }
    }

    fn user_prompt(batch_json: &serde_json::Value) -> String {
        format!(
            "Videos:\n{}",
            serde_json::to_string_pretty(batch_json).unwrap_or_default()
        )
    }
}

#[async_trait]
impl FilmClassifier for ClaudeFilmClassifier {
    async fn classify_content(&self, batch: &[Candidate]) -> Result<Vec<ContentVerdict>> {
        let items: Vec<serde_json::Value> = batch
            .iter()
            .map(|c| {
                serde_json::json!({
                    "title": c.title,
                    "description": truncate_chars(&c.description, 500),
                    "duration_minutes": duration_minutes_rounded(c.duration_secs),
                    "tags": c.tags,
                    "user": c.author,
                    "views": c.plays.unwrap_or(0),
                })
            })
            .collect();

        let response: ContentBatchResponse = self
            .claude
            .extract(
                CONTENT_SYSTEM_PROMPT,
                Self::user_prompt(&serde_json::Value::Array(items)),
            )
            .await?;
        Ok(response.verdicts)
    }

    async fn verify_narrative(&self, batch: &[Candidate]) -> Result<Vec<NarrativeVerdict>> {
        let items: Vec<serde_json::Value> = batch
            .iter()
            .map(|c| {
                serde_json::json!({
                    "title": c.title,
                    "description": truncate_chars(&c.description, 800),
                    "duration_minutes": duration_minutes_rounded(c.duration_secs),
                    // Richer context: what the first pass saw in this video.
                    "content_reasoning": c.content.as_ref().map(|v| v.reasoning.as_str()).unwrap_or(""),
                    "tags": c.tags.iter().take(10).collect::<Vec<_>>(),
                    "user": c.author,
                })
            })
            .collect();

        let response: NarrativeBatchResponse = self
            .claude
            .extract(
                NARRATIVE_SYSTEM_PROMPT,
                Self::user_prompt(&serde_json::Value::Array(items)),
            )
            .await?;
        Ok(response.verdicts)
    }

    async fn verify_era(&self, batch: &[Candidate]) -> Result<Vec<EraVerdict>> {
        let items: Vec<serde_json::Value> = batch
            .iter()
            .map(|c| {
                serde_json::json!({
                    "title": c.title,
                    "description": truncate_chars(&c.description, 800),
                    "duration_minutes": duration_minutes_rounded(c.duration_secs),
                    "upload_date": truncate_chars(&c.created_time, 10),
                    "user": c.author,
                    "film_reasoning": c.narrative.as_ref().map(|v| v.reasoning.as_str()).unwrap_or(""),
                })
            })
            .collect();

        let response: EraBatchResponse = self
            .claude
            .extract(
                ERA_SYSTEM_PROMPT,
                Self::user_prompt(&serde_json::Value::Array(items)),
            )
            .await?;
        Ok(response.verdicts)
    }
}

fn duration_minutes_rounded(duration_secs: u32) -> f64 {
    (duration_secs as f64 / 60.0 * 10.0).round() / 10.0
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// =============================================================================
// Staged driver
// =============================================================================

/// Runs the three dependent classification passes, each narrowing the
/// surviving set. A failed batch (transport error, parse failure, or a
/// verdict count that does not match the batch) passes its candidates
/// through unmodified and unfiltered: a transient outage is allowed to cost
/// precision downstream, never recall here.
pub struct StagedClassifier<'a, C: FilmClassifier> {
    classifier: &'a C,
    config: &'a Config,
    pub skip_content: bool,
    pub skip_narrative: bool,
}

impl<'a, C: FilmClassifier> StagedClassifier<'a, C> {
    pub fn new(classifier: &'a C, config: &'a Config) -> Self {
        Self {
            classifier,
            config,
            skip_content: false,
            skip_narrative: false,
        }
    }

    pub async fn run(&self, candidates: Vec<Candidate>, stats: &mut RunStats) -> Vec<Candidate> {
        let classifier = self.classifier;

        // Pass A: content type
        let survivors = if self.skip_content {
            candidates
        } else {
            info!(count = candidates.len(), "Classifier pass: content type");
            stats.content_in = candidates.len() as u32;
            let verdicts = classify_batches(
                &candidates,
                self.config.content_batch_size,
                self.config.classify_delay_ms,
                "content",
                move |batch| classifier.classify_content(batch),
            )
            .await;

            let mut retained = Vec::new();
            for (mut candidate, verdict) in candidates.into_iter().zip(verdicts) {
                match verdict {
                    Some(v) => {
                        let keep = v.content_type == ContentType::Movie
                            && v.confidence > CONTENT_CONFIDENCE_MIN;
                        candidate.content = Some(v);
                        if keep {
                            retained.push(candidate);
                        }
                    }
                    None => {
                        stats.content_provisional += 1;
                        retained.push(candidate);
                    }
                }
            }
            stats.content_out = retained.len() as u32;
            retained
        };

        if survivors.is_empty() {
            info!("No candidates survived the content-type pass, halting classifier");
            return survivors;
        }

        // Pass B: feature-film verification
        let survivors = if self.skip_narrative {
            survivors
        } else {
            info!(count = survivors.len(), "Classifier pass: feature film");
            stats.narrative_in = survivors.len() as u32;
            let verdicts = classify_batches(
                &survivors,
                self.config.narrative_batch_size,
                self.config.classify_delay_ms,
                "narrative",
                move |batch| classifier.verify_narrative(batch),
            )
            .await;

            let mut retained = Vec::new();
            for (mut candidate, verdict) in survivors.into_iter().zip(verdicts) {
                match verdict {
                    Some(v) => {
                        let keep = v.is_feature_film && v.confidence > NARRATIVE_CONFIDENCE_MIN;
                        candidate.narrative = Some(v);
                        if keep {
                            retained.push(candidate);
                        }
                    }
                    None => {
                        stats.narrative_provisional += 1;
                        retained.push(candidate);
                    }
                }
            }
            stats.narrative_out = retained.len() as u32;
            retained
        };

        if survivors.is_empty() {
            info!("No candidates survived the feature-film pass, halting classifier");
            return survivors;
        }

        // Pass C: era and studio
        info!(count = survivors.len(), "Classifier pass: era and studio");
        stats.era_in = survivors.len() as u32;
        let verdicts = classify_batches(
            &survivors,
            self.config.era_batch_size,
            self.config.classify_delay_ms,
            "era",
            move |batch| classifier.verify_era(batch),
        )
        .await;

        let mut retained = Vec::new();
        for (mut candidate, verdict) in survivors.into_iter().zip(verdicts) {
            match verdict {
                Some(v) => {
                    let keep = v.is_pre_1965 && v.quality_score >= QUALITY_SCORE_MIN;
                    candidate.era = Some(v);
                    if keep {
                        retained.push(candidate);
                    }
                }
                None => {
                    stats.era_provisional += 1;
                    retained.push(candidate);
                }
            }
        }
        stats.era_out = retained.len() as u32;

        retained
    }
}

/// Shared batch scaffolding for all three passes: chunk the input, call the
/// collaborator once per chunk with a courtesy delay between calls, and
/// return one `Option<V>` per candidate in input order. `None` marks a
/// candidate whose batch failed.
async fn classify_batches<'a, V, F>(
    candidates: &'a [Candidate],
    batch_size: usize,
    delay_ms: u64,
    pass: &str,
    call: F,
) -> Vec<Option<V>>
where
    F: Fn(&'a [Candidate]) -> BoxFuture<'a, Result<Vec<V>>>,
{
    let mut out: Vec<Option<V>> = Vec::with_capacity(candidates.len());

    for (i, batch) in candidates.chunks(batch_size.max(1)).enumerate() {
        if i > 0 && delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        match call(batch).await {
            Ok(verdicts) if verdicts.len() == batch.len() => {
                out.extend(verdicts.into_iter().map(Some));
            }
            Ok(verdicts) => {
                warn!(
                    pass,
                    expected = batch.len(),
                    got = verdicts.len(),
                    "Verdict count mismatch, passing batch through unfiltered"
                );
                out.extend(batch.iter().map(|_| None));
            }
            Err(e) => {
                warn!(pass, error = %e, "Classification batch failed, passing batch through unfiltered");
                out.extend(batch.iter().map(|_| None));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn candidate(title: &str) -> Candidate {
        Candidate {
            url: format!("https://vimeo.com/{title}"),
            title: title.into(),
            description: String::new(),
            duration_secs: 6000,
            created_time: String::new(),
            plays: None,
            likes: None,
            comments: None,
            author: String::new(),
            author_url: String::new(),
            tags: vec![],
            categories: vec![],
            content: None,
            narrative: None,
            era: None,
            crossref: None,
            final_score: None,
        }
    }

    fn test_config() -> Config {
        Config {
            vimeo_access_token: String::new(),
            anthropic_api_key: String::new(),
            tmdb_api_key: String::new(),
            claude_model: String::new(),
            min_duration_secs: 45 * 60,
            max_duration_secs: 180 * 60,
            per_query_results: 5,
            search_delay_ms: 0,
            page_delay_ms: 0,
            content_batch_size: 10,
            narrative_batch_size: 8,
            era_batch_size: 8,
            classify_delay_ms: 0,
            crossref_delay_ms: 0,
            min_crossref_confidence: 70.0,
            output_dir: "outputs".into(),
        }
    }

    fn movie_verdict(confidence: f64) -> ContentVerdict {
        ContentVerdict {
            content_type: ContentType::Movie,
            confidence,
            reasoning: "feature-length drama".into(),
        }
    }

    fn feature_verdict(confidence: f64) -> NarrativeVerdict {
        NarrativeVerdict {
            is_feature_film: true,
            has_narrative: true,
            confidence,
            reasoning: "plot synopsis present".into(),
        }
    }

    fn era_verdict(is_pre_1965: bool, quality_score: u8) -> EraVerdict {
        EraVerdict {
            production_year: Some(1942),
            era: "1940s".into(),
            is_pre_1965,
            production_company: None,
            is_formal_studio: false,
            genre: "drama".into(),
            quality_score,
            reasoning: String::new(),
        }
    }

    /// Scripted classifier: verdicts keyed off the candidate title.
    struct ScriptedClassifier {
        fail_content: bool,
        content_calls: AtomicU32,
        narrative_calls: AtomicU32,
        era_calls: AtomicU32,
    }

    impl ScriptedClassifier {
        fn new() -> Self {
            Self {
                fail_content: false,
                content_calls: AtomicU32::new(0),
                narrative_calls: AtomicU32::new(0),
                era_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl FilmClassifier for ScriptedClassifier {
        async fn classify_content(&self, batch: &[Candidate]) -> Result<Vec<ContentVerdict>> {
            self.content_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_content {
                anyhow::bail!("transport error");
            }
            Ok(batch
                .iter()
                .map(|c| {
                    if c.title.starts_with("movie") {
                        movie_verdict(0.9)
                    } else if c.title.starts_with("lowconf") {
                        movie_verdict(0.5)
                    } else {
                        ContentVerdict {
                            content_type: ContentType::Trailer,
                            confidence: 0.95,
                            reasoning: "short preview".into(),
                        }
                    }
                })
                .collect())
        }

        async fn verify_narrative(&self, batch: &[Candidate]) -> Result<Vec<NarrativeVerdict>> {
            self.narrative_calls.fetch_add(1, Ordering::SeqCst);
            Ok(batch.iter().map(|_| feature_verdict(0.9)).collect())
        }

        async fn verify_era(&self, batch: &[Candidate]) -> Result<Vec<EraVerdict>> {
            self.era_calls.fetch_add(1, Ordering::SeqCst);
            Ok(batch.iter().map(|_| era_verdict(true, 8)).collect())
        }
    }

    #[tokio::test]
    async fn content_pass_applies_type_and_confidence_conjunction() {
        let classifier = ScriptedClassifier::new();
        let config = test_config();
        let staged = StagedClassifier::new(&classifier, &config);
        let mut stats = RunStats::default();

        let input = vec![
            candidate("movie-a"),
            candidate("lowconf-b"),
            candidate("trailer-c"),
            candidate("movie-d"),
        ];

        let out = staged.run(input, &mut stats).await;
        let titles: Vec<&str> = out.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["movie-a", "movie-d"]);
        // Survivors carry all three verdict blocks, in input order.
        assert!(out.iter().all(|c| c.content.is_some()
            && c.narrative.is_some()
            && c.era.is_some()));
    }

    #[tokio::test]
    async fn failed_content_batch_passes_through_unfiltered() {
        let mut classifier = ScriptedClassifier::new();
        classifier.fail_content = true;
        let config = test_config();
        let staged = StagedClassifier::new(&classifier, &config);
        let mut stats = RunStats::default();

        let input: Vec<Candidate> = (0..8).map(|i| candidate(&format!("junk-{i}"))).collect();
        let out = staged.run(input, &mut stats).await;

        // All 8 reached the later passes despite being "junk": the failed
        // batch must not drop anything, and no content verdict is attached.
        assert_eq!(out.len(), 8);
        assert!(out.iter().all(|c| c.content.is_none()));
        assert!(out.iter().all(|c| c.narrative.is_some()));
        assert_eq!(stats.content_provisional, 8);
        assert_eq!(classifier.narrative_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_survivor_set_halts_remaining_passes() {
        let classifier = ScriptedClassifier::new();
        let config = test_config();
        let staged = StagedClassifier::new(&classifier, &config);
        let mut stats = RunStats::default();

        let input = vec![candidate("trailer-a"), candidate("trailer-b")];
        let out = staged.run(input, &mut stats).await;

        assert!(out.is_empty());
        assert_eq!(classifier.narrative_calls.load(Ordering::SeqCst), 0);
        assert_eq!(classifier.era_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn batches_are_chunked_by_configured_size() {
        let classifier = ScriptedClassifier::new();
        let mut config = test_config();
        config.content_batch_size = 3;
        let staged = StagedClassifier::new(&classifier, &config);
        let mut stats = RunStats::default();

        let input: Vec<Candidate> = (0..7).map(|i| candidate(&format!("movie-{i}"))).collect();
        staged.run(input, &mut stats).await;

        assert_eq!(classifier.content_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn skip_flags_bypass_early_passes() {
        let classifier = ScriptedClassifier::new();
        let config = test_config();
        let mut staged = StagedClassifier::new(&classifier, &config);
        staged.skip_content = true;
        staged.skip_narrative = true;
        let mut stats = RunStats::default();

        let input = vec![candidate("trailer-a")];
        let out = staged.run(input, &mut stats).await;

        assert_eq!(classifier.content_calls.load(Ordering::SeqCst), 0);
        assert_eq!(classifier.narrative_calls.load(Ordering::SeqCst), 0);
        assert_eq!(classifier.era_calls.load(Ordering::SeqCst), 1);
        assert_eq!(out.len(), 1);
    }

    /// Length mismatch is a malformed response: same treatment as a
    /// transport error.
    struct ShortResponseClassifier;

    #[async_trait]
    impl FilmClassifier for ShortResponseClassifier {
        async fn classify_content(&self, batch: &[Candidate]) -> Result<Vec<ContentVerdict>> {
            Ok(batch.iter().skip(1).map(|_| movie_verdict(0.9)).collect())
        }

        async fn verify_narrative(&self, batch: &[Candidate]) -> Result<Vec<NarrativeVerdict>> {
            Ok(batch.iter().map(|_| feature_verdict(0.9)).collect())
        }

        async fn verify_era(&self, batch: &[Candidate]) -> Result<Vec<EraVerdict>> {
            Ok(batch.iter().map(|_| era_verdict(true, 9)).collect())
        }
    }

    #[tokio::test]
    async fn verdict_count_mismatch_is_treated_as_batch_failure() {
        let classifier = ShortResponseClassifier;
        let config = test_config();
        let staged = StagedClassifier::new(&classifier, &config);
        let mut stats = RunStats::default();

        let input = vec![candidate("a"), candidate("b"), candidate("c")];
        let out = staged.run(input, &mut stats).await;

        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|c| c.content.is_none()));
        assert_eq!(stats.content_provisional, 3);
    }

    #[test]
    fn duration_rounds_to_one_decimal() {
        assert_eq!(duration_minutes_rounded(6120), 102.0);
        assert_eq!(duration_minutes_rounded(6310), 105.2);
        assert_eq!(duration_minutes_rounded(0), 0.0);
    }
}
