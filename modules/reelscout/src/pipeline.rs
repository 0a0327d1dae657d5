use std::collections::HashMap;

use tracing::info;

use reelscout_common::{Candidate, Config};

use crate::classifier::StagedClassifier;
use crate::collector::collect_candidates;
use crate::crossref::CrossRefVerifier;
use crate::prefilter;
use crate::ranker;
use crate::traits::{FilmClassifier, TitleIndex, VideoSearcher};

/// Counters from one pipeline run.
#[derive(Debug, Default)]
pub struct RunStats {
    // Collection
    pub queries_run: u32,
    pub videos_found: u32,
    pub duplicates_skipped: u32,
    pub out_of_range: u32,

    // Keyword pre-filter
    pub denylist_dropped: u32,

    // Classifier passes: input size, survivors, and candidates carried
    // through because their batch failed.
    pub content_in: u32,
    pub content_out: u32,
    pub content_provisional: u32,
    pub narrative_in: u32,
    pub narrative_out: u32,
    pub narrative_provisional: u32,
    pub era_in: u32,
    pub era_out: u32,
    pub era_provisional: u32,

    // Cross-reference
    pub crossref_verified: u32,
    pub below_confidence: u32,

    // Final
    pub final_count: u32,
    pub era_distribution: HashMap<String, u32>,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Pipeline Run Complete ===")?;
        writeln!(f, "Queries run:        {}", self.queries_run)?;
        writeln!(f, "Videos found:       {}", self.videos_found)?;
        writeln!(f, "Duplicates skipped: {}", self.duplicates_skipped)?;
        writeln!(f, "Out of range:       {}", self.out_of_range)?;
        writeln!(f, "Keyword-filtered:   {}", self.denylist_dropped)?;
        writeln!(f, "\nClassifier passes (in -> out, carried on failure):")?;
        writeln!(
            f,
            "  Content type:  {} -> {} ({} carried)",
            self.content_in, self.content_out, self.content_provisional
        )?;
        writeln!(
            f,
            "  Feature film:  {} -> {} ({} carried)",
            self.narrative_in, self.narrative_out, self.narrative_provisional
        )?;
        writeln!(
            f,
            "  Era & studio:  {} -> {} ({} carried)",
            self.era_in, self.era_out, self.era_provisional
        )?;
        writeln!(f, "\nTMDb verified:      {}", self.crossref_verified)?;
        writeln!(f, "Below confidence:   {}", self.below_confidence)?;
        writeln!(f, "Final candidates:   {}", self.final_count)?;
        if !self.era_distribution.is_empty() {
            writeln!(f, "\nBy era:")?;
            let mut eras: Vec<_> = self.era_distribution.iter().collect();
            eras.sort_by(|a, b| a.0.cmp(b.0));
            for (era, count) in eras {
                writeln!(f, "  {era}: {count}")?;
            }
        }
        Ok(())
    }
}

/// The full curation pipeline, cheapest filter first. Each stage consumes
/// its predecessor's complete output; an empty surviving set at any stage
/// boundary ends the run with an empty result.
pub struct Pipeline<'a, S, C, T>
where
    S: VideoSearcher + ?Sized,
    C: FilmClassifier,
    T: TitleIndex + ?Sized,
{
    searcher: &'a S,
    classifier: &'a C,
    index: &'a T,
    config: &'a Config,
    queries: &'a [&'a str],
    pub skip_content_stage: bool,
    pub skip_narrative_stage: bool,
}

impl<'a, S, C, T> Pipeline<'a, S, C, T>
where
    S: VideoSearcher + ?Sized,
    C: FilmClassifier,
    T: TitleIndex + ?Sized,
{
    pub fn new(
        searcher: &'a S,
        classifier: &'a C,
        index: &'a T,
        config: &'a Config,
        queries: &'a [&'a str],
    ) -> Self {
        Self {
            searcher,
            classifier,
            index,
            config,
            queries,
            skip_content_stage: false,
            skip_narrative_stage: false,
        }
    }

    pub async fn run(&self) -> (Vec<Candidate>, RunStats) {
        let mut stats = RunStats::default();

        // Stage 1: search and collect
        let candidates =
            collect_candidates(self.searcher, self.queries, self.config, &mut stats).await;
        if candidates.is_empty() {
            info!("No candidates collected, ending run");
            return (candidates, stats);
        }

        // Stage 2: keyword pre-filter, before any paid classification call
        let candidates = prefilter::apply(candidates, &mut stats);
        if candidates.is_empty() {
            info!("No candidates passed the keyword pre-filter, ending run");
            return (candidates, stats);
        }

        // Stage 3: staged classification
        let mut staged = StagedClassifier::new(self.classifier, self.config);
        staged.skip_content = self.skip_content_stage;
        staged.skip_narrative = self.skip_narrative_stage;
        let candidates = staged.run(candidates, &mut stats).await;
        if candidates.is_empty() {
            info!("No candidates survived classification, ending run");
            return (candidates, stats);
        }

        // Stage 4: cross-reference. Annotates everything; the confidence
        // threshold below is a separate retention decision.
        let mut candidates = candidates;
        let verifier = CrossRefVerifier::new(self.index, self.config.crossref_delay_ms);
        verifier.verify_all(&mut candidates, &mut stats).await;

        let min_confidence = self.config.min_crossref_confidence;
        let candidates: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| {
                let confidence = c.crossref.as_ref().map(|x| x.confidence).unwrap_or(0.0);
                if confidence >= min_confidence {
                    true
                } else {
                    stats.below_confidence += 1;
                    false
                }
            })
            .collect();
        if candidates.is_empty() {
            info!("No candidates met the cross-reference confidence threshold, ending run");
            return (candidates, stats);
        }

        // Stage 5: fuse signals and rank
        let candidates = ranker::rank(candidates);

        stats.final_count = candidates.len() as u32;
        for candidate in &candidates {
            if let Some(era) = &candidate.era {
                *stats.era_distribution.entry(era.era.clone()).or_insert(0) += 1;
            }
        }

        (candidates, stats)
    }
}
