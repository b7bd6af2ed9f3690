use serde::Serialize;

use crate::model::{Platform, ScoredVideoRecord, ScoringProfile, TrendDirection};
use crate::pipeline::stage4_score::ScoringPass;
use crate::stats::{mean, median};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformBaseline {
    pub platform: Platform,
    pub baseline_views: f64,
}

/// Headline analytics over the records currently on display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub n_records: usize,
    pub breakout_score: f64,
    pub breakout_count: usize,
    /// Percent of displayed records, 0 when nothing is displayed.
    pub breakout_share_pct: f64,
    pub fence_outlier_count: usize,
    pub median_engagement_pct: f64,
    pub mean_engagement_rate: f64,
    pub mean_completion_rate: Option<f64>,
    pub median_views_per_hour: f64,
    pub median_outlier_multiplier: f64,
    pub strongest_outlier_multiplier: f64,
    pub total_views: u64,
    pub top_performer: Option<String>,
    pub highest_views: Option<String>,
    pub top_category: Option<String>,
    pub fastest_platform: Option<Platform>,
    pub trend: TrendDirection,
    pub upper_fence: f64,
    pub global_median_views: f64,
    pub baselines: Vec<PlatformBaseline>,
}

pub fn summarize(
    displayed: &[ScoredVideoRecord],
    pass: &ScoringPass,
    profile: &ScoringProfile,
) -> CohortSummary {
    let n = displayed.len();
    let breakout_count = displayed
        .iter()
        .filter(|s| s.is_breakout(profile.breakout_score))
        .count();
    let breakout_share_pct = if n > 0 {
        breakout_count as f64 / n as f64 * 100.0
    } else {
        0.0
    };

    let engagement = displayed
        .iter()
        .map(|s| s.record.engagement_rate)
        .collect::<Vec<_>>();
    let engagement_pct = engagement.iter().map(|e| e * 100.0).collect::<Vec<_>>();
    let velocity = displayed
        .iter()
        .map(|s| s.record.views_per_hour)
        .collect::<Vec<_>>();
    let multipliers = displayed
        .iter()
        .map(|s| s.outlier_multiplier)
        .collect::<Vec<_>>();
    let completion = displayed
        .iter()
        .filter_map(|s| s.record.completion_rate)
        .collect::<Vec<_>>();

    CohortSummary {
        n_records: n,
        breakout_score: profile.breakout_score,
        breakout_count,
        breakout_share_pct,
        fence_outlier_count: displayed.iter().filter(|s| s.is_threshold_outlier).count(),
        median_engagement_pct: median(&engagement_pct),
        mean_engagement_rate: mean(&engagement),
        mean_completion_rate: (!completion.is_empty()).then(|| mean(&completion)),
        median_views_per_hour: median(&velocity),
        median_outlier_multiplier: median(&multipliers),
        strongest_outlier_multiplier: multipliers.iter().copied().fold(0.0, f64::max),
        total_views: displayed.iter().map(|s| s.record.views).sum(),
        top_performer: first_max_by(displayed, |s| s.record.performance_score)
            .map(|s| s.record.id.clone()),
        highest_views: first_max_by(displayed, |s| s.record.views as f64)
            .map(|s| s.record.id.clone()),
        top_category: top_category(displayed),
        fastest_platform: fastest_platform(displayed),
        trend: cohort_trend(displayed, profile.trend_band),
        upper_fence: pass.fence.upper_fence,
        global_median_views: pass.baselines.global_median(),
        baselines: pass
            .baselines
            .effective()
            .into_iter()
            .map(|(platform, baseline_views)| PlatformBaseline {
                platform,
                baseline_views,
            })
            .collect(),
    }
}

/// First element holding the maximum key.
fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let k = key(item);
        match best {
            Some((_, b)) if k <= b => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}

/// Groups in first-seen order and returns the group with the highest mean;
/// ties go to the group seen first.
fn best_group_mean<K: PartialEq + Clone>(entries: impl Iterator<Item = (K, f64)>) -> Option<K> {
    let mut groups: Vec<(K, f64, usize)> = Vec::new();
    for (key, value) in entries {
        match groups.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, sum, count)) => {
                *sum += value;
                *count += 1;
            }
            None => groups.push((key, value, 1)),
        }
    }
    let means = groups
        .into_iter()
        .map(|(k, sum, count)| (k, sum / count as f64))
        .collect::<Vec<_>>();
    first_max_by(&means, |(_, m)| *m).map(|(k, _)| k.clone())
}

fn top_category(displayed: &[ScoredVideoRecord]) -> Option<String> {
    best_group_mean(
        displayed
            .iter()
            .filter(|s| !s.record.category.is_empty())
            .map(|s| (s.record.category.clone(), s.record.performance_score)),
    )
}

fn fastest_platform(displayed: &[ScoredVideoRecord]) -> Option<Platform> {
    best_group_mean(
        displayed
            .iter()
            .map(|s| (s.record.platform, s.record.views_per_hour)),
    )
}

/// Mean of up=+1, down=-1 over the set; unlabelled records count as stable.
pub fn cohort_trend(displayed: &[ScoredVideoRecord], band: f64) -> TrendDirection {
    if displayed.is_empty() {
        return TrendDirection::Stable;
    }
    let total: f64 = displayed
        .iter()
        .filter_map(|s| s.record.trend_direction)
        .map(|t| t.weight())
        .sum();
    let score = total / displayed.len() as f64;
    if score > band {
        TrendDirection::Up
    } else if score < -band {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_summary.rs"]
mod tests;
