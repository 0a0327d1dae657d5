use std::collections::HashSet;
use std::time::Duration;

use tracing::{info, warn};

use reelscout_common::{Candidate, Config};
use vimeo_client::VideoMetadata;

use crate::pipeline::RunStats;
use crate::traits::VideoSearcher;

/// Query param names that vary per share link without changing the video
/// they point to. Stripped before the URL is used as the dedup key.
const TRACKING_PARAMS: &[&str] = &[
    "fbclid",
    "gclid",
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "ref",
    "share",
];

/// Run every query against the search collaborator, merge the results, and
/// return the deduplicated union in discovery order.
///
/// One query's failed page fetch ends that query's pagination (partial
/// results kept) but never aborts the remaining queries. First occurrence
/// of a canonical URL wins; later hits from any query are discarded whole.
pub async fn collect_candidates<S: VideoSearcher + ?Sized>(
    searcher: &S,
    queries: &[&str],
    config: &Config,
    stats: &mut RunStats,
) -> Vec<Candidate> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut candidates: Vec<Candidate> = Vec::new();

    for (i, query) in queries.iter().enumerate() {
        info!(query, n = i + 1, total = queries.len(), "Searching");
        stats.queries_run += 1;

        let videos = search_one_query(searcher, query, config).await;
        stats.videos_found += videos.len() as u32;

        for video in videos {
            if !in_duration_range(
                video.duration_secs,
                config.min_duration_secs,
                config.max_duration_secs,
            ) {
                stats.out_of_range += 1;
                continue;
            }

            let url = canonical_url(&video.url);
            if !seen_urls.insert(url.clone()) {
                stats.duplicates_skipped += 1;
                continue;
            }

            candidates.push(to_candidate(video, url));
        }

        if i + 1 < queries.len() && config.search_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.search_delay_ms)).await;
        }
    }

    info!(
        unique = candidates.len(),
        found = stats.videos_found,
        duplicates = stats.duplicates_skipped,
        out_of_range = stats.out_of_range,
        "Collection complete"
    );

    candidates
}

/// Page through one query up to the per-query cap. A failed page keeps
/// whatever earlier pages returned.
async fn search_one_query<S: VideoSearcher + ?Sized>(
    searcher: &S,
    query: &str,
    config: &Config,
) -> Vec<VideoMetadata> {
    let cap = config.per_query_results as usize;
    let mut videos: Vec<VideoMetadata> = Vec::new();
    let mut page = 1;

    while videos.len() < cap {
        let page_size = (cap - videos.len()) as u32;

        let result = match searcher.search(query, page_size, page).await {
            Ok(r) => r,
            Err(e) => {
                warn!(query, page, error = %e, "Search page failed, keeping partial results");
                break;
            }
        };

        let has_next = result.has_next;
        let room = cap - videos.len();
        videos.extend(result.videos.into_iter().take(room));

        if !has_next {
            break;
        }
        page += 1;
        if config.page_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.page_delay_ms)).await;
        }
    }

    videos
}

/// Range filter over duration. Unknown (0) fails: the filter exists to keep
/// things known to be feature-length, not things that merely might be.
pub fn in_duration_range(duration_secs: u32, min_secs: u32, max_secs: u32) -> bool {
    duration_secs != 0 && duration_secs >= min_secs && duration_secs <= max_secs
}

/// Strip tracking parameters and fragments so the same video shared through
/// different links dedups to one key.
pub fn canonical_url(raw: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    if parsed.query().is_none() {
        return parsed.to_string();
    }

    let clean_pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if clean_pairs.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(clean_pairs);
    }

    parsed.to_string()
}

fn to_candidate(video: VideoMetadata, url: String) -> Candidate {
    Candidate {
        url,
        title: video.title,
        description: video.description,
        duration_secs: video.duration_secs,
        created_time: video.created_time,
        plays: video.plays,
        likes: video.likes,
        comments: video.comments,
        author: video.author,
        author_url: video.author_url,
        tags: video.tags,
        categories: video.categories,
        content: None,
        narrative: None,
        era: None,
        crossref: None,
        final_score: None,
    }
}
