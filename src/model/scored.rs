use serde::{Deserialize, Serialize};

use crate::model::video::VideoRecord;

/// A [`VideoRecord`] annotated by one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVideoRecord {
    #[serde(flatten)]
    pub record: VideoRecord,
    /// `views / baseline_views`.
    pub outlier_multiplier: f64,
    /// Views strictly above the cohort-wide IQR upper fence.
    pub is_threshold_outlier: bool,
    pub baseline_views: f64,
    /// Same value for every record of one pass.
    pub upper_fence: f64,
}

impl ScoredVideoRecord {
    pub fn is_breakout(&self, breakout_score: f64) -> bool {
        self.record.performance_score >= breakout_score
    }
}
