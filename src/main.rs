use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use shortflow_cohortqc::error::CliError;
use shortflow_cohortqc::input::{
    load_cohort, load_events, load_profile, sample_cohort, validate_profile,
};
use shortflow_cohortqc::logging;
use shortflow_cohortqc::model::{DateRange, Platform, ScoringProfile};
use shortflow_cohortqc::pipeline::run_query;
use shortflow_cohortqc::pipeline::stage1_latest::collapse_latest;
use shortflow_cohortqc::pipeline::stage2_derive::derive_cohort;
use shortflow_cohortqc::pipeline::stage3_window::CohortQuery;
use shortflow_cohortqc::pipeline::stage6_report::{ReportInput, write_cohort, write_reports};

const TOOL_NAME: &str = "shortflow-cohortqc";

#[derive(Parser, Debug)]
#[command(name = TOOL_NAME, author, version, about)]
struct Cli {
    /// Debug logging unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a cohort against per-platform baselines and write reports.
    Score(ScoreArgs),
    /// Build a ranked cohort file from raw scrape events.
    Derive(DeriveArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Cohort JSON (array or {"items": [...]}), optionally gzipped.
    #[arg(long, required_unless_present = "sample", conflicts_with = "sample")]
    input: Option<PathBuf>,

    /// Use the built-in trending sample.
    #[arg(long)]
    sample: bool,

    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value = "7d")]
    range: DateRange,

    /// Explicit window in hours; overrides --range.
    #[arg(long)]
    window_hours: Option<f64>,

    #[arg(long)]
    platform: Option<Platform>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    outliers_only: bool,

    /// Minimum outlier multiplier for --outliers-only.
    #[arg(long, env = "SHORTFLOW_OUTLIER_THRESHOLD")]
    threshold: Option<f64>,

    #[arg(long, env = "SHORTFLOW_BREAKOUT_SCORE")]
    breakout_score: Option<f64>,

    /// JSON scoring profile; explicit flags take precedence.
    #[arg(long)]
    profile: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DeriveArgs {
    /// Raw scrape events JSON, optionally gzipped.
    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    out: PathBuf,

    /// Reference time (RFC 3339); defaults to the current time.
    #[arg(long)]
    now: Option<String>,

    #[arg(long, default_value_t = 7)]
    max_age_days: u32,

    #[arg(long)]
    profile: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(logging::default_level(cli.verbose));
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Score(args) => run_score(&args),
        Command::Derive(args) => run_derive(&args),
    }
}

fn run_score(args: &ScoreArgs) -> Result<(), CliError> {
    let profile = resolve_profile(args.profile.as_deref(), args.threshold, args.breakout_score)?;
    let query = build_query(args)?;

    let loaded = match &args.input {
        Some(path) => load_cohort(path)?,
        None => sample_cohort()?,
    };

    let view = run_query(&loaded.items, &query, &profile);
    if view.displayed.is_empty() {
        tracing::warn!("no videos match the current filters");
    }

    let report = ReportInput {
        view: &view,
        profile: &profile,
        origin: loaded.origin.clone(),
        fingerprint: loaded.fingerprint,
        n_records: loaded.items.len(),
        tool_name: TOOL_NAME.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: read_git_hash(Path::new(".")),
    };
    write_reports(&report, &args.out).map_err(|source| CliError::Write {
        path: args.out.clone(),
        source,
    })
}

fn run_derive(args: &DeriveArgs) -> Result<(), CliError> {
    let profile = resolve_profile(args.profile.as_deref(), None, None)?;
    let now = resolve_now(args.now.as_deref())?;

    let events = load_events(&args.input)?;
    let states = collapse_latest(&events.items);
    let cohort = derive_cohort(&states, now, args.max_age_days, &profile);
    tracing::info!(
        events = events.items.len(),
        reels = states.len(),
        kept = cohort.len(),
        now = %now,
        "derived cohort"
    );

    write_cohort(&cohort, &args.out).map_err(|source| CliError::Write {
        path: args.out.clone(),
        source,
    })
}

fn build_query(args: &ScoreArgs) -> Result<CohortQuery, CliError> {
    if let Some(h) = args.window_hours {
        if !h.is_finite() || h < 0.0 {
            return Err(CliError::InvalidArgument(format!(
                "--window-hours must be a non-negative number, got {h}"
            )));
        }
    }
    Ok(CohortQuery {
        range: args.range,
        window_hours: args.window_hours,
        platform: args.platform,
        category: args.category.clone().filter(|c| !c.is_empty()),
        outliers_only: args.outliers_only,
    })
}

fn resolve_profile(
    path: Option<&Path>,
    threshold: Option<f64>,
    breakout_score: Option<f64>,
) -> Result<ScoringProfile, CliError> {
    let mut profile = match path {
        Some(path) => load_profile(path)?,
        None => ScoringProfile::default_v1(),
    };
    if let Some(t) = threshold {
        profile.outlier_multiplier_threshold = t;
    }
    if let Some(s) = breakout_score {
        profile.breakout_score = s;
    }
    validate_profile(&profile)?;
    Ok(profile)
}

fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>, CliError> {
    match now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| CliError::InvalidArgument(format!("--now {raw}: {e}"))),
        None => Ok(Utc::now()),
    }
}

fn read_git_hash(repo_root: &Path) -> Option<String> {
    let head = repo_root.join(".git/HEAD");
    let content = std::fs::read_to_string(head).ok()?;
    if let Some(ref_line) = content.strip_prefix("ref: ") {
        let ref_path = repo_root.join(".git").join(ref_line.trim());
        return std::fs::read_to_string(ref_path)
            .ok()
            .map(|s| s.trim().to_string());
    }
    Some(content.trim().to_string())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
