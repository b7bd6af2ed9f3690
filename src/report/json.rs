use crate::model::ScoredVideoRecord;
use crate::model::VideoRecord;
use crate::report::SummaryData;

pub fn render_summary_json(data: &SummaryData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

pub fn render_scored_json(records: &[ScoredVideoRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Cohort file in the feed's `{"items": [...]}` envelope.
pub fn render_cohort_json(records: &[VideoRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serde_json::json!({ "items": records }))
}
