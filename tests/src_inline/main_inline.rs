use super::*;

fn score_args(cli: Cli) -> ScoreArgs {
    match cli.command {
        Command::Score(args) => args,
        other => panic!("expected score, got {other:?}"),
    }
}

#[test]
fn test_score_defaults() {
    let cli = Cli::try_parse_from([TOOL_NAME, "score", "--sample", "--out", "out"]).unwrap();
    assert!(!cli.verbose);
    let args = score_args(cli);
    assert!(args.sample);
    assert_eq!(args.input, None);
    assert_eq!(args.range, DateRange::Days7);
    let query = build_query(&args).unwrap();
    assert_eq!(query.resolved_window_hours(), 168.0);
    assert_eq!(query.platform, None);
    assert!(!query.outliers_only);
}

#[test]
fn test_score_filters() {
    let cli = Cli::try_parse_from([
        TOOL_NAME,
        "-v",
        "score",
        "--input",
        "cohort.json.gz",
        "--out",
        "out",
        "--range",
        "30d",
        "--platform",
        "TikTok",
        "--category",
        "Pets",
        "--outliers-only",
    ])
    .unwrap();
    assert!(cli.verbose);
    let args = score_args(cli);
    assert_eq!(args.input, Some(PathBuf::from("cohort.json.gz")));
    let query = build_query(&args).unwrap();
    assert_eq!(query.range, DateRange::Days30);
    assert_eq!(query.resolved_window_hours(), 720.0);
    assert_eq!(query.platform, Some(Platform::Tiktok));
    assert_eq!(query.category.as_deref(), Some("Pets"));
    assert!(query.outliers_only);
}

#[test]
fn test_window_hours_overrides_range() {
    let cli = Cli::try_parse_from([
        TOOL_NAME,
        "score",
        "--sample",
        "--out",
        "out",
        "--range",
        "90d",
        "--window-hours",
        "12",
    ])
    .unwrap();
    let query = build_query(&score_args(cli)).unwrap();
    assert_eq!(query.resolved_window_hours(), 12.0);
}

#[test]
fn test_negative_window_rejected() {
    let cli = Cli::try_parse_from([
        TOOL_NAME,
        "score",
        "--sample",
        "--out",
        "out",
        "--window-hours=-1",
    ])
    .unwrap();
    assert!(matches!(
        build_query(&score_args(cli)),
        Err(CliError::InvalidArgument(_))
    ));
}

#[test]
fn test_input_source_is_required_and_exclusive() {
    assert!(Cli::try_parse_from([TOOL_NAME, "score", "--out", "out"]).is_err());
    assert!(
        Cli::try_parse_from([
            TOOL_NAME, "score", "--sample", "--input", "a.json", "--out", "out"
        ])
        .is_err()
    );
}

#[test]
fn test_unknown_platform_and_range_rejected() {
    assert!(
        Cli::try_parse_from([
            TOOL_NAME, "score", "--sample", "--out", "out", "--platform", "vine"
        ])
        .is_err()
    );
    assert!(
        Cli::try_parse_from([TOOL_NAME, "score", "--sample", "--out", "out", "--range", "1y"])
            .is_err()
    );
}

#[test]
fn test_derive_args() {
    let cli = Cli::try_parse_from([
        TOOL_NAME,
        "derive",
        "--input",
        "events.json",
        "--out",
        "cohort.json",
        "--now",
        "2025-06-01T00:00:00Z",
    ])
    .unwrap();
    match cli.command {
        Command::Derive(args) => {
            assert_eq!(args.max_age_days, 7);
            let now = resolve_now(args.now.as_deref()).unwrap();
            assert_eq!(now.to_rfc3339(), "2025-06-01T00:00:00+00:00");
        }
        other => panic!("expected derive, got {other:?}"),
    }
}

#[test]
fn test_resolve_now_rejects_garbage() {
    assert!(matches!(
        resolve_now(Some("yesterday")),
        Err(CliError::InvalidArgument(_))
    ));
    assert!(resolve_now(None).is_ok());
}

#[test]
fn test_profile_overrides() {
    let profile = resolve_profile(None, Some(2.5), Some(90.0)).unwrap();
    assert_eq!(profile.outlier_multiplier_threshold, 2.5);
    assert_eq!(profile.breakout_score, 90.0);
    assert_eq!(profile.iqr_fence_k, 1.5);

    let profile = resolve_profile(None, None, None).unwrap();
    assert_eq!(profile, ScoringProfile::default_v1());

    assert!(matches!(
        resolve_profile(None, Some(f64::NAN), None),
        Err(CliError::Input(_))
    ));
}

#[test]
fn test_profile_file_then_flags() {
    let mut path = std::env::temp_dir();
    path.push(format!("shortflow_main_profile_{}.json", std::process::id()));
    std::fs::write(&path, r#"{"outlier_multiplier_threshold": 4.0, "iqr_fence_k": 3.0}"#)
        .unwrap();

    let profile = resolve_profile(Some(&path), None, None).unwrap();
    assert_eq!(profile.outlier_multiplier_threshold, 4.0);
    assert_eq!(profile.iqr_fence_k, 3.0);

    let profile = resolve_profile(Some(&path), Some(2.0), None).unwrap();
    assert_eq!(profile.outlier_multiplier_threshold, 2.0);
    assert_eq!(profile.iqr_fence_k, 3.0);
}

#[test]
fn test_read_git_hash_missing_repo() {
    let mut dir = std::env::temp_dir();
    dir.push(format!("shortflow_no_git_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    assert_eq!(read_git_hash(&dir), None);
}

#[test]
fn test_nan_breakout_score_rejected() {
    let cli = Cli::try_parse_from([
        TOOL_NAME,
        "score",
        "--sample",
        "--out",
        "out",
        "--breakout-score",
        "NaN",
    ])
    .unwrap();
    let args = score_args(cli);
    assert!(matches!(
        resolve_profile(args.profile.as_deref(), args.threshold, args.breakout_score),
        Err(CliError::Input(_))
    ));
}
