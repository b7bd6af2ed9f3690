use std::fmt::Write;

use crate::model::{Platform, ScoredVideoRecord, TrendDirection};
use crate::report::{SummaryData, format_compact};

const TOP_N: usize = 5;

pub fn render_report_text(data: &SummaryData, displayed: &[ScoredVideoRecord]) -> String {
    let c = &data.cohort;
    let mut out = String::new();

    out.push_str("Short-Form Cohort Performance Report\n");
    out.push_str("====================================\n\n");

    out.push_str("1. Cohort\n");
    let _ = writeln!(out, "Input: {} ({} records)", data.input.origin, data.input.n_records);
    let _ = writeln!(
        out,
        "Window: {} h | platform: {} | category: {}",
        data.query.resolved_window_hours,
        data.query
            .query
            .platform
            .map(|p| p.label())
            .unwrap_or("all"),
        data.query.query.category.as_deref().unwrap_or("All")
    );
    let _ = writeln!(
        out,
        "Selected: {} | in window: {} | displayed: {}{}",
        data.query.n_selected,
        data.query.n_scored,
        c.n_records,
        if data.query.query.outliers_only {
            format!(
                " (outliers >= {}x)",
                data.profile.outlier_multiplier_threshold
            )
        } else {
            String::new()
        }
    );
    out.push('\n');

    if c.n_records == 0 {
        out.push_str("No videos match the current filters.\n");
        return out;
    }

    out.push_str("2. Baselines\n");
    for platform in Platform::ALL {
        match c.baselines.iter().find(|b| b.platform == *platform) {
            Some(b) => {
                let _ = writeln!(
                    out,
                    "{} median views: {}",
                    platform.label(),
                    format_compact(b.baseline_views)
                );
            }
            None => {
                let _ = writeln!(out, "{} median views: - (not in cohort)", platform.label());
            }
        }
    }
    let _ = writeln!(
        out,
        "IQR upper fence: {} ({} above fence)\n",
        format_compact(c.upper_fence),
        c.fence_outlier_count
    );

    out.push_str("3. Momentum\n");
    let _ = writeln!(
        out,
        "Breakout share: {:.0}% ({} videos >= {} score)",
        c.breakout_share_pct, c.breakout_count, c.breakout_score
    );
    let _ = writeln!(out, "Median engagement: {:.2}%", c.median_engagement_pct);
    let _ = writeln!(
        out,
        "Median velocity: {}/hr",
        format_compact(c.median_views_per_hour)
    );
    let _ = writeln!(
        out,
        "Median outlier factor: {:.1}x | strongest: {:.1}x",
        c.median_outlier_multiplier, c.strongest_outlier_multiplier
    );
    let _ = writeln!(out, "Total views: {}", format_compact(c.total_views as f64));
    if let Some(completion) = c.mean_completion_rate {
        let _ = writeln!(out, "Average completion: {:.1}%", completion * 100.0);
    }
    let _ = writeln!(
        out,
        "Fastest platform: {} | top category: {}",
        c.fastest_platform.map(|p| p.label()).unwrap_or("-"),
        c.top_category.as_deref().unwrap_or("-")
    );
    let _ = writeln!(out, "Trend: {}\n", trend_statement(c.trend));

    out.push_str("4. Leaders\n");
    let mut leaders = displayed.iter().collect::<Vec<_>>();
    leaders.sort_by(|a, b| b.outlier_multiplier.total_cmp(&a.outlier_multiplier));
    for s in leaders.into_iter().take(TOP_N) {
        let r = &s.record;
        let handle = r.handle();
        let _ = writeln!(
            out,
            "{} {} [{}] {} views, {:.2}x over {} median{}{}",
            r.rank.map(|n| format!("#{n}")).unwrap_or_else(|| "-".to_string()),
            r.id,
            r.platform.label(),
            format_compact(r.views as f64),
            s.outlier_multiplier,
            format_compact(s.baseline_views),
            if handle.is_empty() {
                String::new()
            } else {
                format!(" {handle}")
            },
            if s.is_threshold_outlier {
                " (above fence)"
            } else {
                ""
            }
        );
    }
    out.push('\n');

    out.push_str(
        "Outlier = views / platform median (time window). IQR upper fence = Q3 + k*IQR.\n",
    );
    out
}

fn trend_statement(trend: TrendDirection) -> &'static str {
    match trend {
        TrendDirection::Up => "cohort momentum is rising",
        TrendDirection::Stable => "cohort momentum is steady",
        TrendDirection::Down => "cohort momentum is cooling",
    }
}
