use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::model::platform::Platform;

/// Momentum label carried by trending samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Stable,
    Down,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Stable => "stable",
            TrendDirection::Down => "down",
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            TrendDirection::Up => 1.0,
            TrendDirection::Stable => 0.0,
            TrendDirection::Down => -1.0,
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrendDirection {
    type Err = TrendDirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(TrendDirection::Up),
            "stable" => Ok(TrendDirection::Stable),
            "down" => Ok(TrendDirection::Down),
            _ => Err(TrendDirectionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown trend direction: {0}")]
pub struct TrendDirectionParseError(String);

/// One video's performance snapshot as delivered by the performance feed.
///
/// Derived metrics and percentiles are computed upstream and trusted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(rename = "reel_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel_url: Option<String>,
    pub platform: Platform,
    #[serde(default)]
    pub category: String,

    pub publish_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_scraped_at: Option<DateTime<Utc>>,
    pub hours_since_publish: f64,

    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub shares_or_saves: u64,

    #[serde(default)]
    pub views_per_hour: f64,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub views_percentile: f64,
    #[serde(default)]
    pub views_per_hour_percentile: f64,
    #[serde(default)]
    pub engagement_rate_percentile: f64,
    #[serde(default)]
    pub performance_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_direction: Option<TrendDirection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption_text: Option<String>,
}

impl VideoRecord {
    /// Minimal record with every optional field empty and all derived metrics zero.
    pub fn new(
        id: impl Into<String>,
        platform: Platform,
        publish_time: DateTime<Utc>,
        hours_since_publish: f64,
        views: u64,
    ) -> Self {
        Self {
            id: id.into(),
            reel_url: None,
            platform,
            category: String::new(),
            publish_time,
            latest_scraped_at: None,
            hours_since_publish,
            views,
            likes: 0,
            comments: 0,
            shares_or_saves: 0,
            views_per_hour: 0.0,
            engagement_rate: 0.0,
            views_percentile: 0.0,
            views_per_hour_percentile: 0.0,
            engagement_rate_percentile: 0.0,
            performance_score: 0.0,
            rank: None,
            completion_rate: None,
            trend_direction: None,
            thumbnail_url: None,
            creator_username: None,
            caption_text: None,
        }
    }

    /// Creator handle normalised to a leading `@`, empty when unknown.
    pub fn handle(&self) -> String {
        match self.creator_username.as_deref() {
            None | Some("") => String::new(),
            Some(h) if h.starts_with('@') => h.to_string(),
            Some(h) => format!("@{h}"),
        }
    }
}

pub(crate) fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/video.rs"]
mod tests;
