use crate::{
    dom::{Dom, Node, Query},
    number::find_count,
    options::CrawlOptions,
    selectors::{
        COMMENT_COUNT_CANDIDATES, REACTION_CANDIDATES, SHARE_CANDIDATES, SHARE_LABEL_RE,
    },
    types::EngagementMetrics,
};

/// Reaction, comment and share counts, each zero when not found.
pub fn extract_engagement_metrics<D: Dom>(dom: &D, options: &CrawlOptions) -> EngagementMetrics {
    let mut metrics = EngagementMetrics::default();

    // the counter renders late, but a post without reactions never shows it
    if let Some(first) = REACTION_CANDIDATES.first() {
        if let Err(e) = dom.wait_for(first, options.reaction_wait) {
            debug!("reaction counter did not show up: {}", e);
        }
    }
    metrics.reactions_count = scan_candidates(dom, &REACTION_CANDIDATES, options.metric_reads);
    metrics.comments_count = scan_candidates(dom, &COMMENT_COUNT_CANDIDATES, options.metric_reads);
    metrics.shares_count = scan_share_labels(dom, &SHARE_CANDIDATES);

    debug!("engagement metrics {:?}", metrics);
    metrics
}

/// Tries each selector in turn and stops at the first visible element holding
/// a count. The same element may be read several times since nested spans
/// render the number in stages; the largest reading is kept.
fn scan_candidates<D: Dom>(dom: &D, candidates: &[Query], reads: usize) -> u64 {
    let mut best = 0;

    for query in candidates {
        let element = match dom.find_first(query) {
            Ok(Some(el)) => el,
            Ok(None) => continue,
            Err(e) => {
                debug!("lookup of {} failed: {}", query.selector(), e);
                continue;
            }
        };
        match element.is_visible() {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                debug!("visibility check of {} failed: {}", query.selector(), e);
                continue;
            }
        }

        let mut matched = false;
        for _ in 0..reads.max(1) {
            let text = match element.inner_text() {
                Ok(t) => t.trim().to_lowercase(),
                Err(e) => {
                    debug!("could not read {}: {}", query.selector(), e);
                    continue;
                }
            };
            if let Some(value) = find_count(&text) {
                best = best.max(value);
                matched = true;
            }
        }
        if matched {
            break;
        }
    }

    best
}

/// Share labels are looked for among every match, since the first span with
/// "share" in it is usually the share button itself. The first element whose
/// whole text reads like "12 shares" wins.
fn scan_share_labels<D: Dom>(dom: &D, candidates: &[Query]) -> u64 {
    for query in candidates {
        let elements = match dom.find_all(query) {
            Ok(els) => els,
            Err(e) => {
                debug!("lookup of {} failed: {}", query.selector(), e);
                continue;
            }
        };
        for element in elements {
            if !matches!(element.is_visible(), Ok(true)) {
                continue;
            }
            let text = match element.inner_text() {
                Ok(t) => t.trim().to_lowercase(),
                Err(_) => continue,
            };
            if !SHARE_LABEL_RE.is_match(&text) {
                continue;
            }
            if let Some(value) = find_count(&text) {
                return value;
            }
        }
    }

    0
}
