use std::time::Duration;

use tracing::{info, warn};

use reelscout_common::{Candidate, CrossRef};

use crate::pipeline::RunStats;
use crate::traits::{TitleIndex, TitleMatch, TitleRecord};

/// Minimum normalized title similarity to accept a database match at all.
const SIMILARITY_MIN: f64 = 0.6;
/// Similarity at which a title match alone substitutes for studio provenance.
const SIMILARITY_STRONG: f64 = 0.85;
/// Tolerance between official runtime and candidate duration, in minutes.
const RUNTIME_TOLERANCE_MIN: f64 = 10.0;
/// Films released before this year count as classics.
const CUTOFF_YEAR: i32 = 1965;

/// Name fragments of classic Hollywood majors and established independents.
/// A production company counts as classic when any fragment is a
/// case-insensitive substring of its name.
pub const CLASSIC_STUDIO_FRAGMENTS: &[&str] = &[
    "metro-goldwyn-mayer",
    "mgm",
    "paramount",
    "warner bros",
    "warner brothers",
    "universal",
    "20th century fox",
    "20th century-fox",
    "twentieth century fox",
    "rko",
    "columbia",
    "united artists",
    "republic pictures",
    "monogram pictures",
    "allied artists",
    "american international pictures",
    "aip",
    "selznick",
    "criterion",
    "british film institute",
    "ealing",
    "hammer film",
    "pathé",
    "gaumont",
    "ufa",
    "mosfilm",
    "toho",
];

/// Lowercase, trim, and strip leading articles before comparison, so that
/// "The Maltese Falcon" and "Maltese Falcon (1941)" compare on substance.
pub fn normalize_title(title: &str) -> String {
    let mut t = title.trim().to_lowercase();
    for article in ["the ", "a ", "an "] {
        if let Some(stripped) = t.strip_prefix(article) {
            t = stripped.to_string();
        }
    }
    t
}

/// Symmetric edit-similarity between two titles in [0, 1]; 1.0 for
/// identical strings after normalization.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize_title(a), &normalize_title(b))
}

/// Company names that match a classic-studio fragment.
pub fn classic_studio_matches(companies: &[String]) -> Vec<String> {
    companies
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            CLASSIC_STUDIO_FRAGMENTS
                .iter()
                .any(|fragment| lower.contains(fragment))
        })
        .cloned()
        .collect()
}

pub struct CrossRefVerifier<'a, T: TitleIndex + ?Sized> {
    index: &'a T,
    delay_ms: u64,
}

impl<'a, T: TitleIndex + ?Sized> CrossRefVerifier<'a, T> {
    pub fn new(index: &'a T, delay_ms: u64) -> Self {
        Self { index, delay_ms }
    }

    /// Attach a cross-reference record to every candidate. Failures for one
    /// candidate leave it unverified and never abort the batch; dropping on
    /// verification is a later, separate decision.
    pub async fn verify_all(&self, candidates: &mut [Candidate], stats: &mut RunStats) {
        let total = candidates.len();
        info!(total, "Cross-referencing candidates against TMDb");

        for (i, candidate) in candidates.iter_mut().enumerate() {
            if i > 0 && self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }

            let record = self.verify_one(candidate).await;
            if record.verified {
                stats.crossref_verified += 1;
                info!(
                    title = candidate.title.as_str(),
                    confidence = record.confidence,
                    year = ?record.release_year,
                    "Verified"
                );
            } else {
                info!(
                    title = candidate.title.as_str(),
                    reason = record.match_reason.as_str(),
                    "Not verified"
                );
            }
            candidate.crossref = Some(record);
        }
    }

    async fn verify_one(&self, candidate: &Candidate) -> CrossRef {
        let year_hint = candidate.era.as_ref().and_then(|e| e.production_year);

        let matches = match self.index.search_title(&candidate.title, year_hint).await {
            Ok(m) => m,
            Err(e) => {
                warn!(title = candidate.title.as_str(), error = %e, "Title search failed");
                return unverified("Title search failed");
            }
        };

        if matches.is_empty() {
            return unverified("No TMDb match found");
        }

        // Best match by normalized title similarity; first result wins ties.
        let mut best: Option<(&TitleMatch, f64)> = None;
        for m in &matches {
            let similarity = title_similarity(&candidate.title, &m.title);
            if best.as_ref().map_or(true, |(_, b)| similarity > *b) {
                best = Some((m, similarity));
            }
        }
        let (best, best_similarity) = best.expect("non-empty matches");

        if best_similarity < SIMILARITY_MIN {
            return unverified(&format!(
                "Best title match only {:.0}% similar",
                best_similarity * 100.0
            ));
        }

        let details = match self.index.title_details(best.id).await {
            Ok(d) => d,
            Err(e) => {
                warn!(title = candidate.title.as_str(), error = %e, "Details fetch failed");
                return unverified("Could not fetch movie details from TMDb");
            }
        };

        build_record(candidate, best.id, best_similarity, details)
    }
}

fn unverified(reason: &str) -> CrossRef {
    CrossRef {
        match_reason: reason.to_string(),
        ..CrossRef::default()
    }
}

/// Derive the verification record for an accepted title match.
fn build_record(
    candidate: &Candidate,
    tmdb_id: u64,
    similarity: f64,
    details: TitleRecord,
) -> CrossRef {
    let release_year = details.release_year;
    let is_pre_cutoff = release_year.is_some_and(|y| y < CUTOFF_YEAR);

    let matching = classic_studio_matches(&details.production_companies);
    let is_classic_studio = !matching.is_empty();
    let studios = if is_classic_studio {
        matching
    } else {
        details
            .production_companies
            .iter()
            .take(3)
            .cloned()
            .collect()
    };

    let runtime_match = details.runtime_minutes.is_some_and(|runtime| {
        let candidate_minutes = candidate.duration_secs as f64 / 60.0;
        (runtime as f64 - candidate_minutes).abs() <= RUNTIME_TOLERANCE_MIN
    });

    // Additive confidence, capped at 100: title similarity dominates, era
    // and provenance carry the rest.
    let mut confidence = similarity * 40.0;
    if is_pre_cutoff {
        confidence += 30.0;
    }
    if is_classic_studio {
        confidence += 20.0;
    }
    if runtime_match {
        confidence += 10.0;
    }
    let confidence = confidence.min(100.0);

    // Era correctness is mandatory; an exceptionally strong title match can
    // substitute for studio provenance, never for era.
    let verified = is_pre_cutoff && (is_classic_studio || similarity >= SIMILARITY_STRONG);

    let match_reason = if verified {
        if is_classic_studio {
            format!(
                "Verified classic movie: pre-1965 from {}",
                studios
                    .iter()
                    .take(2)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        } else {
            "Verified classic movie: pre-1965".to_string()
        }
    } else if is_pre_cutoff {
        "Pre-1965 but uncertain studio/title match".to_string()
    } else {
        match release_year {
            Some(year) => format!("Released in {year} (after 1965 cutoff)"),
            None => "Release year unknown (cannot confirm pre-1965)".to_string(),
        }
    };

    CrossRef {
        verified,
        confidence,
        tmdb_id: Some(tmdb_id),
        tmdb_title: details.title,
        release_year,
        is_pre_1965: is_pre_cutoff,
        studios,
        is_classic_studio,
        runtime_minutes: details.runtime_minutes,
        runtime_match,
        title_similarity: similarity,
        match_reason,
    }
}
