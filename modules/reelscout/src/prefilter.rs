use tracing::info;

use reelscout_common::Candidate;

use crate::pipeline::RunStats;

/// Terms strongly correlated with non-feature content. A single hit in the
/// title, description, or tag text drops the candidate before any paid
/// classification call is made. Conservative on purpose: the later stages
/// are expected to catch what this list lets through.
pub const DENYLIST: &[&str] = &[
    "trailer",
    "teaser",
    "promo",
    "preview",
    "clip",
    "behind the scenes",
    "making of",
    "breakdown",
    "vfx",
    "test",
    "demo",
    "reel",
    "showreel",
    "recap",
    "review",
    "analysis",
    "essay",
    "critique",
    "supercut",
    "compilation",
    "montage",
    "tribute",
    "how to",
    "tutorial",
    "lesson",
    "workshop",
    "interview",
    "q&a",
    "panel",
    "discussion",
    "opener",
    "bumper",
    "ident",
    "logo",
    "intro",
    "campaign",
    "commercial",
    "spot",
];

/// First denylist term found in the candidate's text fields, if any.
/// Lower-cased substring match over title, description, and the
/// space-joined tags.
pub fn denylist_hit(candidate: &Candidate) -> Option<&'static str> {
    let title = candidate.title.to_lowercase();
    let description = candidate.description.to_lowercase();
    let tags = candidate.tags.join(" ").to_lowercase();

    DENYLIST.iter().copied().find(|keyword| {
        title.contains(keyword) || description.contains(keyword) || tags.contains(keyword)
    })
}

/// Drop candidates with denylist hits, reporting the matched keyword.
pub fn apply(candidates: Vec<Candidate>, stats: &mut RunStats) -> Vec<Candidate> {
    let before = candidates.len();

    let survivors: Vec<Candidate> = candidates
        .into_iter()
        .filter(|candidate| match denylist_hit(candidate) {
            Some(keyword) => {
                info!(
                    title = candidate.title.as_str(),
                    keyword, "Dropped by keyword pre-filter"
                );
                stats.denylist_dropped += 1;
                false
            }
            None => true,
        })
        .collect();

    info!(
        passed = survivors.len(),
        dropped = before - survivors.len(),
        "Keyword pre-filter complete"
    );

    survivors
}
