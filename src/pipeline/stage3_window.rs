use serde::Serialize;

use crate::model::{DateRange, Platform, VideoRecord};

/// Every filter the dashboard exposes, passed explicitly into each pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortQuery {
    pub range: DateRange,
    /// Overrides `range` when set.
    pub window_hours: Option<f64>,
    pub platform: Option<Platform>,
    pub category: Option<String>,
    pub outliers_only: bool,
}

impl CohortQuery {
    pub fn resolved_window_hours(&self) -> f64 {
        self.window_hours.unwrap_or_else(|| self.range.window_hours())
    }

    pub fn matches(&self, record: &VideoRecord) -> bool {
        if let Some(platform) = self.platform {
            if record.platform != platform {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &record.category != category {
                return false;
            }
        }
        true
    }
}

/// Applies the platform and category filters and orders the survivors by
/// rank. Time windowing is left to the scorer.
pub fn select_cohort(cohort: &[VideoRecord], query: &CohortQuery) -> Vec<VideoRecord> {
    let mut selected = cohort
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect::<Vec<_>>();
    order_by_rank(&mut selected);
    selected
}

/// Stable sort by ascending rank; unranked records keep their order after ranked ones.
pub fn order_by_rank(records: &mut [VideoRecord]) {
    records.sort_by_key(|r| r.rank.unwrap_or(u32::MAX));
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_window.rs"]
mod tests;
