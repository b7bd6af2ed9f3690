use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::{ScoredVideoRecord, ScoringProfile, VideoRecord};
use crate::pipeline::CohortView;
use crate::report::json::{render_cohort_json, render_scored_json, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::{
    InputMeta, QueryMeta, SummaryData, ToolMeta, format_f64_6, format_fingerprint,
};

pub const SCORED_TSV: &str = "scored.tsv";
pub const SCORED_JSON: &str = "scored.json";
pub const SUMMARY_JSON: &str = "summary.json";
pub const REPORT_TXT: &str = "report.txt";

#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub view: &'a CohortView,
    pub profile: &'a ScoringProfile,

    pub origin: String,
    pub fingerprint: u64,
    pub n_records: usize,

    pub tool_name: String,
    pub tool_version: String,
    pub git_hash: Option<String>,
}

pub fn write_reports(input: &ReportInput<'_>, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    write_scored_tsv(&input.view.displayed, &out_dir.join(SCORED_TSV))?;

    let scored = render_scored_json(&input.view.displayed)?;
    write_text(&out_dir.join(SCORED_JSON), &scored)?;

    let summary = build_summary(input);
    let json = render_summary_json(&summary)?;
    write_text(&out_dir.join(SUMMARY_JSON), &json)?;

    let report = render_report_text(&summary, &input.view.displayed);
    write_text(&out_dir.join(REPORT_TXT), &report)?;

    tracing::info!(
        out_dir = %out_dir.display(),
        rows = input.view.displayed.len(),
        "reports written"
    );
    Ok(())
}

/// Writes a derived cohort in the envelope `score --input` reads back.
pub fn write_cohort(records: &[VideoRecord], path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = render_cohort_json(records)?;
    write_text(path, &json)?;
    tracing::info!(path = %path.display(), records = records.len(), "cohort written");
    Ok(())
}

pub fn build_summary(input: &ReportInput<'_>) -> SummaryData {
    let view = input.view;
    SummaryData {
        tool: ToolMeta {
            name: input.tool_name.clone(),
            version: input.tool_version.clone(),
            git_hash: input.git_hash.clone(),
        },
        input: InputMeta {
            origin: input.origin.clone(),
            fingerprint: format_fingerprint(input.fingerprint),
            n_records: input.n_records,
        },
        query: QueryMeta {
            query: view.query.clone(),
            resolved_window_hours: view.window_hours,
            n_selected: view.n_selected,
            n_scored: view.pass.scored.len(),
        },
        profile: input.profile.clone(),
        cohort: view.summary.clone(),
    }
}

fn write_scored_tsv(records: &[ScoredVideoRecord], path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let header = [
        "rank",
        "reel_id",
        "platform",
        "category",
        "creator_username",
        "hours_since_publish",
        "views",
        "likes",
        "comments",
        "shares_or_saves",
        "views_per_hour",
        "engagement_rate",
        "performance_score",
        "baseline_views",
        "outlier_multiplier",
        "upper_fence",
        "is_threshold_outlier",
        "trend_direction",
    ]
    .join("\t");
    writeln!(w, "{}", header)?;

    for s in records {
        let r = &s.record;
        let row = [
            r.rank.map(|n| n.to_string()).unwrap_or_default(),
            tsv_field(&r.id),
            r.platform.as_str().to_string(),
            tsv_field(&r.category),
            tsv_field(r.creator_username.as_deref().unwrap_or("")),
            format_f64_6(r.hours_since_publish),
            r.views.to_string(),
            r.likes.to_string(),
            r.comments.to_string(),
            r.shares_or_saves.to_string(),
            format_f64_6(r.views_per_hour),
            format_f64_6(r.engagement_rate),
            format_f64_6(r.performance_score),
            format_f64_6(s.baseline_views),
            format_f64_6(s.outlier_multiplier),
            format_f64_6(s.upper_fence),
            s.is_threshold_outlier.to_string(),
            r.trend_direction
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
        ]
        .join("\t");
        writeln!(w, "{}", row)?;
    }
    w.flush()
}

fn tsv_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
