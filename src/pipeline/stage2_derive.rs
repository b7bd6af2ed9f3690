use chrono::{DateTime, Duration, Utc};

use crate::model::ScoringProfile;
use crate::model::VideoRecord;
use crate::model::reel::LatestState;
use crate::stats::{percentile_ranks, round_to};

#[derive(Debug, Clone)]
pub struct DerivedMetrics {
    pub state: LatestState,
    pub hours_since_publish: f64,
    pub views_per_hour: f64,
    pub engagement_rate: f64,
}

pub fn hours_since_publish(publish: DateTime<Utc>, now: DateTime<Utc>, min_hours: f64) -> f64 {
    let hours = (now - publish).num_milliseconds() as f64 / 3_600_000.0;
    hours.max(min_hours)
}

fn safe_div(num: f64, denom: f64) -> f64 {
    if denom == 0.0 { 0.0 } else { num / denom }
}

pub fn compute_derived_metrics(
    states: &[LatestState],
    now: DateTime<Utc>,
    profile: &ScoringProfile,
) -> Vec<DerivedMetrics> {
    states
        .iter()
        .map(|state| {
            let hours = hours_since_publish(state.publish_time, now, profile.min_hours_since_publish);
            let views = state.latest_views as f64;
            let interactions = state.latest_likes as f64
                + state.latest_comments as f64
                + state.latest_shares_or_saves as f64;
            DerivedMetrics {
                state: state.clone(),
                hours_since_publish: hours,
                views_per_hour: safe_div(views, hours),
                engagement_rate: safe_div(interactions, views),
            }
        })
        .collect()
}

/// Ranks each metric within the batch and folds the ranks into the
/// composite performance score. Ranks are taken on unrounded values.
pub fn attach_percentiles(derived: &[DerivedMetrics], profile: &ScoringProfile) -> Vec<VideoRecord> {
    if derived.is_empty() {
        return Vec::new();
    }

    let views = derived
        .iter()
        .map(|d| d.state.latest_views as f64)
        .collect::<Vec<_>>();
    let velocity = derived.iter().map(|d| d.views_per_hour).collect::<Vec<_>>();
    let engagement = derived.iter().map(|d| d.engagement_rate).collect::<Vec<_>>();

    let views_pct = percentile_ranks(&views);
    let velocity_pct = percentile_ranks(&velocity);
    let engagement_pct = percentile_ranks(&engagement);

    let w = profile.weights;
    derived
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let score = w.engagement * engagement_pct[i]
                + w.velocity * velocity_pct[i]
                + w.views * views_pct[i];
            let s = &d.state;
            let mut record = VideoRecord::new(
                s.reel_id.clone(),
                s.platform,
                s.publish_time,
                round_to(d.hours_since_publish, 2),
                s.latest_views,
            );
            record.reel_url = Some(s.reel_url.clone()).filter(|u| !u.is_empty());
            record.category = s.category.clone().unwrap_or_default();
            record.latest_scraped_at = Some(s.latest_scraped_at);
            record.likes = s.latest_likes;
            record.comments = s.latest_comments;
            record.shares_or_saves = s.latest_shares_or_saves;
            record.views_per_hour = round_to(d.views_per_hour, 2);
            record.engagement_rate = round_to(d.engagement_rate, 4);
            record.views_percentile = views_pct[i];
            record.views_per_hour_percentile = velocity_pct[i];
            record.engagement_rate_percentile = engagement_pct[i];
            record.performance_score = round_to(score, 2);
            record.creator_username = s.creator_username.clone();
            record.caption_text = s.caption_text.clone();
            record
        })
        .collect()
}

/// Assigns 1-based ranks by descending performance score, ties broken by id.
pub fn assign_ranks(records: &mut [VideoRecord]) {
    let mut order = (0..records.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        records[b]
            .performance_score
            .total_cmp(&records[a].performance_score)
            .then_with(|| records[a].id.cmp(&records[b].id))
    });
    for (rank, idx) in order.into_iter().enumerate() {
        records[idx].rank = Some(rank as u32 + 1);
    }
}

/// Builds a ranked cohort from latest states published within `max_age_days` of `now`.
pub fn derive_cohort(
    states: &[LatestState],
    now: DateTime<Utc>,
    max_age_days: u32,
    profile: &ScoringProfile,
) -> Vec<VideoRecord> {
    let cutoff = now - Duration::days(max_age_days as i64);
    let recent = states
        .iter()
        .filter(|s| s.publish_time >= cutoff)
        .cloned()
        .collect::<Vec<_>>();
    if recent.len() < states.len() {
        tracing::info!(
            dropped = states.len() - recent.len(),
            max_age_days,
            "dropped reels published before the age cutoff"
        );
    }

    let derived = compute_derived_metrics(&recent, now, profile);
    let mut records = attach_percentiles(&derived, profile);
    assign_ranks(&mut records);
    records
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_derive.rs"]
mod tests;
