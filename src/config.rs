use serde::{Deserialize, Serialize};

/// Tunables consumed by the metrics calculators.
///
/// The calculators never read the environment; callers construct (or
/// deserialize) one of these and pass it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// A listing with days-on-market at or above this counts as stale.
    pub stale_threshold_days: i64,
    /// A listing with days-on-market at or below this counts as fresh.
    pub fresh_threshold_days: i64,
    /// Number of equal-width histogram buckets.
    pub bucket_count: usize,
    /// Tukey fence multiplier for outlier detection.
    pub iqr_multiplier: f64,
    /// Epsilon added to |distance| in the weight `1 / (|distance| + eps)`,
    /// so a listing at the exact center gets a large but finite weight.
    pub distance_epsilon: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            stale_threshold_days: 60,
            fresh_threshold_days: 14,
            bucket_count: 5,
            iqr_multiplier: 1.5,
            distance_epsilon: 0.1,
        }
    }
}
