use tracing::info;

use reelscout_common::Candidate;

/// Combine the independent per-candidate signals into one score in
/// [0, 100]. Pure and deterministic: recomputed from scratch whenever any
/// contributing field changes, because the bonus bands are stepped, not
/// smooth.
///
/// The band constants are contractual; changing them silently reorders the
/// output.
pub fn fuse_score(candidate: &Candidate) -> f64 {
    let mut score = 0.0;

    // Classifier confidence, 0-40.
    let quality = candidate
        .era
        .as_ref()
        .map(|e| e.quality_score)
        .unwrap_or(0);
    score += (quality as f64 / 10.0) * 40.0;

    // Cross-reference confidence, 0-30.
    let crossref_confidence = candidate
        .crossref
        .as_ref()
        .map(|x| x.confidence)
        .unwrap_or(0.0);
    score += (crossref_confidence / 100.0) * 30.0;

    score += duration_bonus(candidate.duration_secs as f64 / 60.0);
    score += popularity_bonus(candidate.plays.unwrap_or(0));

    // Cross-reference verified bonus.
    if candidate.crossref.as_ref().is_some_and(|x| x.verified) {
        score += 10.0;
    }

    (score * 10.0).round() / 10.0
}

/// 0-10 points for how close the duration sits to the classic feature
/// sweet spot.
fn duration_bonus(minutes: f64) -> f64 {
    if (70.0..=120.0).contains(&minutes) {
        10.0
    } else if (60.0..=150.0).contains(&minutes) {
        7.0
    } else if (45.0..=180.0).contains(&minutes) {
        4.0
    } else {
        0.0
    }
}

/// 0-10 points for view count; unknown counts as zero views.
fn popularity_bonus(views: u64) -> f64 {
    if views >= 100_000 {
        10.0
    } else if views >= 50_000 {
        7.0
    } else if views >= 10_000 {
        5.0
    } else if views >= 1_000 {
        3.0
    } else {
        0.0
    }
}

/// Score every candidate and order descending. The sort is stable: equal
/// scores keep the order they held entering the ranker, and callers must
/// not assume any further tie-break.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    for candidate in &mut candidates {
        candidate.final_score = Some(fuse_score(candidate));
    }

    candidates.sort_by(|a, b| {
        b.final_score
            .unwrap_or(0.0)
            .total_cmp(&a.final_score.unwrap_or(0.0))
    });

    if let Some(top) = candidates.first() {
        info!(
            count = candidates.len(),
            top_title = top.title.as_str(),
            top_score = top.final_score.unwrap_or(0.0),
            "Ranked candidates"
        );
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelscout_common::{CrossRef, EraVerdict};

    fn candidate(duration_secs: u32, plays: Option<u64>) -> Candidate {
        Candidate {
            url: "https://vimeo.com/1".into(),
            title: "Test".into(),
            description: String::new(),
            duration_secs,
            created_time: String::new(),
            plays,
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

    fn era(quality_score: u8) -> EraVerdict {
        EraVerdict {
            production_year: Some(1942),
            era: "1940s".into(),
            is_pre_1965: true,
            production_company: None,
            is_formal_studio: true,
            genre: "drama".into(),
            quality_score,
            reasoning: String::new(),
        }
    }

    fn crossref(confidence: f64, verified: bool) -> CrossRef {
        CrossRef {
            verified,
            confidence,
            ..CrossRef::default()
        }
    }

    #[test]
    fn fusion_scenario_scores_93() {
        // 105 min, quality 9, crossref 90, verified, 150k views:
        // 36 + 27 + 10 + 10 + 10 = 93.
        let mut c = candidate(6300, Some(150_000));
        c.era = Some(era(9));
        c.crossref = Some(crossref(90.0, true));

        assert_eq!(fuse_score(&c), 93.0);
    }

    #[test]
    fn fusion_is_deterministic_and_bounded() {
        let mut c = candidate(6300, Some(150_000));
        c.era = Some(era(10));
        c.crossref = Some(crossref(100.0, true));

        let first = fuse_score(&c);
        let second = fuse_score(&c);
        assert_eq!(first, second);
        assert_eq!(first, 100.0);

        let bare = candidate(0, None);
        assert_eq!(fuse_score(&bare), 0.0);
    }

    #[test]
    fn missing_stage_blocks_contribute_zero() {
        // Duration band alone: 90 minutes → 10 points.
        let c = candidate(90 * 60, None);
        assert_eq!(fuse_score(&c), 10.0);
    }

    #[test]
    fn duration_bands_step_at_documented_edges() {
        assert_eq!(duration_bonus(70.0), 10.0);
        assert_eq!(duration_bonus(120.0), 10.0);
        assert_eq!(duration_bonus(69.9), 7.0);
        assert_eq!(duration_bonus(150.0), 7.0);
        assert_eq!(duration_bonus(45.0), 4.0);
        assert_eq!(duration_bonus(180.0), 4.0);
        assert_eq!(duration_bonus(44.9), 0.0);
        assert_eq!(duration_bonus(181.0), 0.0);
    }

    #[test]
    fn popularity_bands_step_at_documented_edges() {
        assert_eq!(popularity_bonus(100_000), 10.0);
        assert_eq!(popularity_bonus(99_999), 7.0);
        assert_eq!(popularity_bonus(50_000), 7.0);
        assert_eq!(popularity_bonus(10_000), 5.0);
        assert_eq!(popularity_bonus(1_000), 3.0);
        assert_eq!(popularity_bonus(999), 0.0);
        assert_eq!(popularity_bonus(0), 0.0);
    }

    #[test]
    fn rank_is_descending_and_stable_for_ties() {
        // Two identical-score candidates keep entry order; a higher-scored
        // third moves ahead of both.
        let mut first = candidate(90 * 60, None);
        first.url = "https://vimeo.com/first".into();
        let mut second = candidate(90 * 60, None);
        second.url = "https://vimeo.com/second".into();
        let mut strong = candidate(90 * 60, Some(200_000));
        strong.url = "https://vimeo.com/strong".into();

        let ranked = rank(vec![first, second, strong]);

        let urls: Vec<&str> = ranked.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://vimeo.com/strong",
                "https://vimeo.com/first",
                "https://vimeo.com/second"
            ]
        );
        assert_eq!(ranked[1].final_score, ranked[2].final_score);
    }
}
