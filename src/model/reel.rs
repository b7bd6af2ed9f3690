use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::platform::Platform;
use crate::model::video::null_as_zero;

/// One scrape observation of a reel. A reel is observed many times over its life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawScrapeEvent {
    pub reel_id: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub reel_url: String,
    pub scraped_at: DateTime<Utc>,
    pub publish_time: DateTime<Utc>,
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares_or_saves: Option<u64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub creator_username: Option<String>,
    #[serde(default)]
    pub caption_text: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

/// Most recent observation of a single reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestState {
    pub reel_id: String,
    pub platform: Platform,
    pub reel_url: String,
    pub publish_time: DateTime<Utc>,
    pub latest_scraped_at: DateTime<Utc>,
    pub latest_views: u64,
    pub latest_likes: u64,
    pub latest_comments: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub latest_shares_or_saves: u64,
    pub category: Option<String>,
    pub creator_username: Option<String>,
    pub caption_text: Option<String>,
    pub duration_seconds: Option<f64>,
}

impl From<&RawScrapeEvent> for LatestState {
    fn from(event: &RawScrapeEvent) -> Self {
        Self {
            reel_id: event.reel_id.clone(),
            platform: event.platform,
            reel_url: event.reel_url.clone(),
            publish_time: event.publish_time,
            latest_scraped_at: event.scraped_at,
            latest_views: event.views,
            latest_likes: event.likes,
            latest_comments: event.comments,
            latest_shares_or_saves: event.shares_or_saves.unwrap_or(0),
            category: event.category.clone(),
            creator_username: event.creator_username.clone(),
            caption_text: event.caption_text.clone(),
            duration_seconds: event.duration_seconds,
        }
    }
}
