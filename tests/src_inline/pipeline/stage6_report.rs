use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::input::{load_cohort, sample_cohort};
use crate::pipeline::run_query;
use crate::pipeline::stage3_window::CohortQuery;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("shortflow_report_test_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_view(query: &CohortQuery, profile: &ScoringProfile) -> (CohortView, u64, usize) {
    let loaded = sample_cohort().unwrap();
    let view = run_query(&loaded.items, query, profile);
    (view, loaded.fingerprint, loaded.items.len())
}

fn report_input<'a>(
    view: &'a CohortView,
    profile: &'a ScoringProfile,
    fingerprint: u64,
    n_records: usize,
) -> ReportInput<'a> {
    ReportInput {
        view,
        profile,
        origin: "built-in sample".to_string(),
        fingerprint,
        n_records,
        tool_name: "shortflow-cohortqc".to_string(),
        tool_version: "0.1.0".to_string(),
        git_hash: None,
    }
}

#[test]
fn test_write_reports_creates_all_files() {
    let profile = ScoringProfile::default_v1();
    let (view, fingerprint, n) = sample_view(&CohortQuery::default(), &profile);
    let dir = make_temp_dir();
    write_reports(&report_input(&view, &profile, fingerprint, n), &dir).unwrap();

    for name in [SCORED_TSV, SCORED_JSON, SUMMARY_JSON, REPORT_TXT] {
        assert!(dir.join(name).exists(), "missing {name}");
    }

    let tsv = std::fs::read_to_string(dir.join(SCORED_TSV)).unwrap();
    let lines = tsv.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 13);
    assert!(lines[0].starts_with("rank\treel_id\tplatform"));
    assert!(lines[1].starts_with("1\tig_aurora_flow\tinstagram"));
    assert_eq!(lines[1].split('\t').count(), lines[0].split('\t').count());
}

#[test]
fn test_summary_json_carries_query_and_cohort() {
    let profile = ScoringProfile::default_v1();
    let (view, fingerprint, n) = sample_view(&CohortQuery::default(), &profile);
    let dir = make_temp_dir();
    write_reports(&report_input(&view, &profile, fingerprint, n), &dir).unwrap();

    let raw = std::fs::read_to_string(dir.join(SUMMARY_JSON)).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["tool"]["name"], "shortflow-cohortqc");
    assert_eq!(v["input"]["n_records"], 12);
    assert_eq!(v["input"]["fingerprint"].as_str().unwrap().len(), 16);
    assert_eq!(v["query"]["range"], "7d");
    assert_eq!(v["query"]["resolved_window_hours"], 168.0);
    assert_eq!(v["query"]["n_scored"], 12);
    assert_eq!(v["profile"]["breakout_score"], 95.0);
    assert_eq!(v["cohort"]["n_records"], 12);
    assert_eq!(v["cohort"]["top_performer"], "ig_aurora_flow");
    assert_eq!(v["cohort"]["trend"], "up");
}

#[test]
fn test_scored_json_is_flat_records() {
    let profile = ScoringProfile::default_v1();
    let (view, fingerprint, n) = sample_view(&CohortQuery::default(), &profile);
    let dir = make_temp_dir();
    write_reports(&report_input(&view, &profile, fingerprint, n), &dir).unwrap();

    let raw = std::fs::read_to_string(dir.join(SCORED_JSON)).unwrap();
    let parsed: Vec<ScoredVideoRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), view.displayed.len());
    assert_eq!(parsed[3].record.id, view.displayed[3].record.id);
    assert_eq!(parsed[3].record.views, view.displayed[3].record.views);

    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v[0]["reel_id"], "ig_aurora_flow");
    assert_eq!(v[0]["outlier_multiplier"], 2.54);
    assert_eq!(v[0]["baseline_views"], 500_000.0);
}

#[test]
fn test_outliers_only_report() {
    let mut profile = ScoringProfile::default_v1();
    profile.outlier_multiplier_threshold = 2.5;
    let query = CohortQuery {
        outliers_only: true,
        ..CohortQuery::default()
    };
    let (view, fingerprint, n) = sample_view(&query, &profile);
    let dir = make_temp_dir();
    write_reports(&report_input(&view, &profile, fingerprint, n), &dir).unwrap();

    let tsv = std::fs::read_to_string(dir.join(SCORED_TSV)).unwrap();
    assert_eq!(tsv.lines().count(), 2);
    let report = std::fs::read_to_string(dir.join(REPORT_TXT)).unwrap();
    assert!(report.contains("(outliers >= 2.5x)"));
    assert!(report.contains("ig_aurora_flow"));
}

#[test]
fn test_empty_view_report() {
    let profile = ScoringProfile::default_v1();
    let query = CohortQuery {
        category: Some("Vikings".to_string()),
        ..CohortQuery::default()
    };
    let (view, fingerprint, n) = sample_view(&query, &profile);
    let dir = make_temp_dir();
    write_reports(&report_input(&view, &profile, fingerprint, n), &dir).unwrap();

    let tsv = std::fs::read_to_string(dir.join(SCORED_TSV)).unwrap();
    assert_eq!(tsv.lines().count(), 1);
    let scored = std::fs::read_to_string(dir.join(SCORED_JSON)).unwrap();
    assert_eq!(scored.trim(), "[]");
    let report = std::fs::read_to_string(dir.join(REPORT_TXT)).unwrap();
    assert!(report.contains("No videos match the current filters."));
    assert!(!report.contains("2. Baselines"));
}

#[test]
fn test_report_text_sections() {
    let profile = ScoringProfile::default_v1();
    let (view, fingerprint, n) = sample_view(&CohortQuery::default(), &profile);
    let summary = build_summary(&report_input(&view, &profile, fingerprint, n));
    let text = render_report_text(&summary, &view.displayed);
    assert!(text.starts_with("Short-Form Cohort Performance Report\n"));
    for section in ["1. Cohort", "2. Baselines", "3. Momentum", "4. Leaders"] {
        assert!(text.contains(section), "missing {section}");
    }
    assert!(text.contains("Instagram median views: 500K"));
    assert!(text.contains("TikTok median views: 407.5K"));
    assert!(text.contains("IQR upper fence: 1.8M (0 above fence)"));
    assert!(text.contains("Trend: cohort momentum is rising"));
}

#[test]
fn test_write_cohort_reads_back() {
    let loaded = sample_cohort().unwrap();
    let dir = make_temp_dir();
    let path = dir.join("nested").join("cohort.json");
    write_cohort(&loaded.items, &path).unwrap();

    let back = load_cohort(&path).unwrap();
    assert_eq!(back.items.len(), loaded.items.len());
    for (a, b) in back.items.iter().zip(&loaded.items) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.platform, b.platform);
        assert_eq!(a.rank, b.rank);
        assert_eq!(a.publish_time, b.publish_time);
        assert_eq!(a.views, b.views);
    }
}

#[test]
fn test_tsv_fields_with_tabs_stay_on_one_row() {
    use chrono::{TimeZone, Utc};

    let publish = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let mut record = VideoRecord::new("clip\t7\nb", crate::model::Platform::Tiktok, publish, 2.0, 100);
    record.category = "Pets\tDogs".to_string();
    let profile = ScoringProfile::default_v1();
    let view = run_query(&[record], &CohortQuery::default(), &profile);
    let dir = make_temp_dir();
    write_reports(&report_input(&view, &profile, 0, 1), &dir).unwrap();

    let tsv = std::fs::read_to_string(dir.join(SCORED_TSV)).unwrap();
    let lines = tsv.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].split('\t').count(), lines[0].split('\t').count());
    assert!(lines[1].contains("clip 7 b\ttiktok\tPets Dogs"));
}

#[test]
fn test_report_lists_every_platform_baseline() {
    let profile = ScoringProfile::default_v1();
    let query = CohortQuery {
        platform: Some(crate::model::Platform::Tiktok),
        ..CohortQuery::default()
    };
    let (view, fingerprint, n) = sample_view(&query, &profile);
    let summary = build_summary(&report_input(&view, &profile, fingerprint, n));
    let text = render_report_text(&summary, &view.displayed);
    assert!(text.contains("TikTok median views: 407.5K"));
    assert!(text.contains("Instagram median views: - (not in cohort)"));
    assert!(text.contains("YouTube median views: - (not in cohort)"));
}
