pub mod stage1_latest;
pub mod stage2_derive;
pub mod stage3_window;
pub mod stage4_score;
pub mod stage5_summary;
pub mod stage6_report;

use crate::model::{ScoredVideoRecord, ScoringProfile, VideoRecord};
use stage3_window::{CohortQuery, select_cohort};
use stage4_score::{ScoringPass, filter_by_outlier_multiplier, score_pass};
use stage5_summary::{CohortSummary, summarize};

/// Result of one query against a cohort.
#[derive(Debug, Clone)]
pub struct CohortView {
    pub query: CohortQuery,
    pub window_hours: f64,
    /// Records left after platform and category filters, before windowing.
    pub n_selected: usize,
    pub pass: ScoringPass,
    /// `pass.scored`, or its outlier subset when the query asks for outliers only.
    pub displayed: Vec<ScoredVideoRecord>,
    pub summary: CohortSummary,
}

/// Filters, orders, scores and summarises a cohort in one pure pass.
pub fn run_query(
    cohort: &[VideoRecord],
    query: &CohortQuery,
    profile: &ScoringProfile,
) -> CohortView {
    let window_hours = query.resolved_window_hours();
    let selected = select_cohort(cohort, query);
    let pass = score_pass(&selected, window_hours, profile.iqr_fence_k);

    let displayed = if query.outliers_only {
        filter_by_outlier_multiplier(&pass.scored, profile.outlier_multiplier_threshold)
    } else {
        pass.scored.clone()
    };
    let summary = summarize(&displayed, &pass, profile);

    tracing::info!(
        window_hours,
        selected = selected.len(),
        scored = pass.scored.len(),
        displayed = displayed.len(),
        "cohort query complete"
    );

    CohortView {
        query: query.clone(),
        window_hours,
        n_selected: selected.len(),
        pass,
        displayed,
        summary,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
