use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::stage4_score::DEFAULT_IQR_FENCE_K;

/// Product-tuned knobs for one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringProfile {
    /// Minimum `views / baseline` kept by the outliers-only view.
    pub outlier_multiplier_threshold: f64,
    /// Performance score at or above which a record counts as a breakout.
    pub breakout_score: f64,
    /// Multiplier on the IQR added to Q3 for the upper fence.
    pub iqr_fence_k: f64,
    /// Trend mean beyond which the cohort reads as up or down.
    pub trend_band: f64,
    pub weights: ScoreWeights,
    /// Floor on hours since publish, so fresh uploads do not divide by zero.
    pub min_hours_since_publish: f64,
}

/// Percentile weights of the composite performance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub engagement: f64,
    pub velocity: f64,
    pub views: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            engagement: 0.45,
            velocity: 0.40,
            views: 0.15,
        }
    }
}

impl ScoringProfile {
    pub fn default_v1() -> Self {
        Self {
            outlier_multiplier_threshold: 3.0,
            breakout_score: 95.0,
            iqr_fence_k: DEFAULT_IQR_FENCE_K,
            trend_band: 0.15,
            weights: ScoreWeights::default(),
            min_hours_since_publish: 1.0 / 60.0,
        }
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}

/// Publish-age window offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateRange {
    #[default]
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
}

impl DateRange {
    pub fn window_hours(&self) -> f64 {
        match self {
            DateRange::Days7 => 168.0,
            DateRange::Days30 => 720.0,
            DateRange::Days90 => 2160.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Days7 => "7d",
            DateRange::Days30 => "30d",
            DateRange::Days90 => "90d",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = DateRangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(DateRange::Days7),
            "30d" => Ok(DateRange::Days30),
            "90d" => Ok(DateRange::Days90),
            _ => Err(DateRangeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown date range: {0} (use 7d|30d|90d)")]
pub struct DateRangeParseError(String);
