use std::collections::BTreeMap;

use crate::model::{Platform, ScoredVideoRecord, VideoRecord};
use crate::stats::{IqrStats, iqr_stats, median};

pub const DEFAULT_IQR_FENCE_K: f64 = 1.5;

/// Median views per platform within one windowed cohort, plus the
/// cohort-wide median used when a platform median is not positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformBaselines {
    per_platform: BTreeMap<Platform, f64>,
    global_median: f64,
}

impl PlatformBaselines {
    pub fn compute(records: &[&VideoRecord]) -> Self {
        let mut buckets: BTreeMap<Platform, Vec<f64>> = BTreeMap::new();
        for r in records {
            buckets.entry(r.platform).or_default().push(r.views as f64);
        }
        let all = records.iter().map(|r| r.views as f64).collect::<Vec<_>>();
        Self {
            per_platform: buckets
                .into_iter()
                .map(|(platform, views)| (platform, median(&views)))
                .collect(),
            global_median: median(&all),
        }
    }

    /// Platform median if positive, else the global median if positive, else 1.
    pub fn baseline_for(&self, platform: Platform) -> f64 {
        match self.per_platform.get(&platform) {
            Some(&m) if m > 0.0 => m,
            _ if self.global_median > 0.0 => self.global_median,
            _ => 1.0,
        }
    }

    pub fn global_median(&self) -> f64 {
        self.global_median
    }

    /// Effective baseline of every platform present in the cohort.
    pub fn effective(&self) -> Vec<(Platform, f64)> {
        self.per_platform
            .keys()
            .map(|&p| (p, self.baseline_for(p)))
            .collect()
    }
}

/// Everything one scoring pass produced.
#[derive(Debug, Clone, Default)]
pub struct ScoringPass {
    pub scored: Vec<ScoredVideoRecord>,
    pub baselines: PlatformBaselines,
    pub fence: IqrStats,
}

/// Scores records published within `window_hours` using the default 1.5×IQR fence.
pub fn score(cohort: &[VideoRecord], window_hours: f64) -> Vec<ScoredVideoRecord> {
    score_pass(cohort, window_hours, DEFAULT_IQR_FENCE_K).scored
}

/// Windows the cohort, derives per-platform baselines and the cohort-wide
/// upper fence, and annotates every surviving record. Input order is kept.
pub fn score_pass(cohort: &[VideoRecord], window_hours: f64, fence_k: f64) -> ScoringPass {
    let windowed = cohort
        .iter()
        .filter(|r| r.hours_since_publish <= window_hours)
        .collect::<Vec<_>>();
    if windowed.is_empty() {
        tracing::debug!(window_hours, "no records inside window");
        return ScoringPass::default();
    }

    let baselines = PlatformBaselines::compute(&windowed);
    let views = windowed.iter().map(|r| r.views as f64).collect::<Vec<_>>();
    let fence = iqr_stats(&views, fence_k);

    let scored = windowed
        .into_iter()
        .map(|r| {
            let baseline = baselines.baseline_for(r.platform);
            let views = r.views as f64;
            ScoredVideoRecord {
                record: r.clone(),
                outlier_multiplier: views / baseline,
                is_threshold_outlier: views > fence.upper_fence,
                baseline_views: baseline,
                upper_fence: fence.upper_fence,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        window_hours,
        records = scored.len(),
        global_median = baselines.global_median(),
        upper_fence = fence.upper_fence,
        "scored cohort"
    );

    ScoringPass {
        scored,
        baselines,
        fence,
    }
}

/// Records whose multiplier reaches `threshold`, order preserved.
pub fn filter_by_outlier_multiplier(
    scored: &[ScoredVideoRecord],
    threshold: f64,
) -> Vec<ScoredVideoRecord> {
    scored
        .iter()
        .filter(|r| r.outlier_multiplier >= threshold)
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_score.rs"]
mod tests;
