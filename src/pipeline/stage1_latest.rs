use std::collections::BTreeMap;

use crate::model::reel::{LatestState, RawScrapeEvent};

/// Reduces a scrape history to one state per reel: the observation with the
/// latest `scraped_at`. Ties keep the event seen first. Output is ordered by
/// reel id.
pub fn collapse_latest(events: &[RawScrapeEvent]) -> Vec<LatestState> {
    if events.is_empty() {
        tracing::warn!("no scrape events to collapse into latest state");
        return Vec::new();
    }

    let mut latest: BTreeMap<&str, &RawScrapeEvent> = BTreeMap::new();
    for event in events {
        latest
            .entry(event.reel_id.as_str())
            .and_modify(|current| {
                if event.scraped_at > current.scraped_at {
                    *current = event;
                }
            })
            .or_insert(event);
    }

    tracing::debug!(
        events = events.len(),
        reels = latest.len(),
        "collapsed scrape events"
    );
    latest.into_values().map(LatestState::from).collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_latest.rs"]
mod tests;
