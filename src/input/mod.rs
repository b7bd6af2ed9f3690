use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub mod reader;

use crate::model::reel::RawScrapeEvent;
use crate::model::{ScoringProfile, VideoRecord};
use reader::{hash_bytes, read_bytes};

const SAMPLE_COHORT: &str = include_str!("../../data/sample_cohort.json");

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A loaded collection plus where it came from.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub origin: String,
    pub fingerprint: u64,
}

pub fn load_cohort(path: &Path) -> Result<Loaded<VideoRecord>, InputError> {
    let bytes = read_bytes(path)?;
    let loaded = parse_items::<VideoRecord>(&bytes, path.display().to_string())?;
    check_unique_ids(loaded.items.iter().map(|r| r.id.as_str()), &loaded.origin)?;
    tracing::info!(
        path = %path.display(),
        records = loaded.items.len(),
        "loaded cohort"
    );
    Ok(loaded)
}

/// The built-in trending sample used when no feed export is at hand.
pub fn sample_cohort() -> Result<Loaded<VideoRecord>, InputError> {
    parse_items::<VideoRecord>(SAMPLE_COHORT.as_bytes(), "built-in sample".to_string())
}

pub fn load_events(path: &Path) -> Result<Loaded<RawScrapeEvent>, InputError> {
    let bytes = read_bytes(path)?;
    let loaded = parse_items::<RawScrapeEvent>(&bytes, path.display().to_string())?;
    tracing::info!(
        path = %path.display(),
        events = loaded.items.len(),
        "loaded scrape events"
    );
    Ok(loaded)
}

pub fn load_profile(path: &Path) -> Result<ScoringProfile, InputError> {
    let bytes = read_bytes(path)?;
    let profile: ScoringProfile =
        serde_json::from_slice(&bytes).map_err(|source| InputError::Parse {
            origin: path.display().to_string(),
            source,
        })?;
    validate_profile(&profile)?;
    Ok(profile)
}

pub fn validate_profile(profile: &ScoringProfile) -> Result<(), InputError> {
    let w = &profile.weights;
    for (name, value) in [
        ("outlier_multiplier_threshold", profile.outlier_multiplier_threshold),
        ("breakout_score", profile.breakout_score),
        ("weights.engagement", w.engagement),
        ("weights.velocity", w.velocity),
        ("weights.views", w.views),
    ] {
        if !value.is_finite() {
            return Err(InputError::InvalidInput(format!("{name} must be finite")));
        }
    }
    if !profile.trend_band.is_finite() || profile.trend_band < 0.0 {
        return Err(InputError::InvalidInput(
            "trend_band must be a non-negative number".to_string(),
        ));
    }
    if !profile.iqr_fence_k.is_finite() || profile.iqr_fence_k < 0.0 {
        return Err(InputError::InvalidInput(
            "iqr_fence_k must be a non-negative number".to_string(),
        ));
    }
    if !profile.min_hours_since_publish.is_finite() || profile.min_hours_since_publish <= 0.0 {
        return Err(InputError::InvalidInput(
            "min_hours_since_publish must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Accepts either a bare array or the `{"items": [...]}` envelope the feed returns.
fn parse_items<T: DeserializeOwned>(bytes: &[u8], origin: String) -> Result<Loaded<T>, InputError> {
    let parse_err = |source| InputError::Parse {
        origin: origin.clone(),
        source,
    };
    let value: Value = serde_json::from_slice(bytes).map_err(parse_err)?;
    let items = match value {
        Value::Object(mut map) => map.remove("items").ok_or_else(|| {
            InputError::InvalidInput(format!("{origin}: expected an array or an object with \"items\""))
        })?,
        other => other,
    };
    let items: Vec<T> = serde_json::from_value(items).map_err(parse_err)?;
    Ok(Loaded {
        items,
        origin,
        fingerprint: hash_bytes(bytes),
    })
}

fn check_unique_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    origin: &str,
) -> Result<(), InputError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(InputError::InvalidInput(format!(
                "duplicate reel_id {id} in {origin}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
