//! Order statistics over view counts and derived metrics.
//!
//! Every function accepts an unsorted slice and returns 0 (or an empty
//! vector) for empty input instead of failing.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IqrStats {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub upper_fence: f64,
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Middle element, or the mean of the two middle elements for even counts.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Quantile of an ascending slice at fractional position `p * (n - 1)`,
/// interpolating linearly between the bracketing elements.
pub fn quantile_lerp(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = (sorted.len() - 1) as f64 * p;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

/// Quartiles and the upper fence `Q3 + k * IQR`.
pub fn iqr_stats(values: &[f64], k: f64) -> IqrStats {
    if values.is_empty() {
        return IqrStats::default();
    }
    let sorted = sorted(values);
    let q1 = quantile_lerp(&sorted, 0.25);
    let q3 = quantile_lerp(&sorted, 0.75);
    let iqr = q3 - q1;
    IqrStats {
        q1,
        q3,
        iqr,
        upper_fence: q3 + k * iqr,
    }
}

/// Percentile rank (0..100) of each value, aligned with the input.
///
/// A value's rank is the last sorted position holding it over `n - 1`, so
/// ties share the higher rank. A single value ranks 100.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let sorted = sorted(values);
    let n = sorted.len();
    if n == 1 {
        return vec![100.0];
    }
    values
        .iter()
        .map(|&v| {
            // bisect right: first index whose element is greater than v
            let idx = sorted.partition_point(|&s| s <= v) - 1;
            round_to(idx as f64 / (n - 1) as f64 * 100.0, 2)
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
#[path = "../tests/src_inline/stats.rs"]
mod tests;
