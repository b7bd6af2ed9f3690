pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::ScoringProfile;
use crate::pipeline::stage3_window::CohortQuery;
use crate::pipeline::stage5_summary::CohortSummary;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
    pub git_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub origin: String,
    /// FNV-1a of the decoded input bytes, hex.
    pub fingerprint: String,
    pub n_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryMeta {
    #[serde(flatten)]
    pub query: CohortQuery,
    pub resolved_window_hours: f64,
    pub n_selected: usize,
    pub n_scored: usize,
}

/// Everything `summary.json` carries.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub input: InputMeta,
    pub query: QueryMeta,
    pub profile: ScoringProfile,
    pub cohort: CohortSummary,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_fingerprint(hash: u64) -> String {
    format!("{:016x}", hash)
}

/// Compact count like `1.3M`, `407.5K` or `950`.
pub fn format_compact(v: f64) -> String {
    let abs = v.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (v / 1e9, "B")
    } else if abs >= 1e6 {
        (v / 1e6, "M")
    } else if abs >= 1e3 {
        (v / 1e3, "K")
    } else {
        (v, "")
    };
    let s = format!("{:.1}", scaled);
    let s = s.strip_suffix(".0").unwrap_or(&s);
    format!("{s}{suffix}")
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
