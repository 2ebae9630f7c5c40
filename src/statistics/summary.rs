//! Outlier-robust summaries of timing samples.
//!
//! The trimmed statistics discard `max(1, floor(n / 10))` samples from each
//! end of the sorted set and report the mean and population standard
//! deviation of what remains. Fewer than [`MIN_TRIM_SAMPLES`] samples fall
//! back to the plain mean with a zero deviation.

use serde::{Deserialize, Serialize};

use super::quantile::{median_sorted, percentile_sorted};

/// Below this many samples no trimming is attempted.
pub const MIN_TRIM_SAMPLES: usize = 3;

/// Mean and spread after outlier trimming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimmedStats {
    /// Arithmetic mean of the retained samples.
    pub mean: f64,
    /// Population standard deviation of the retained samples.
    pub std_dev: f64,
    /// Samples dropped from each end.
    pub trim_count: usize,
    /// Samples the mean was computed over.
    pub retained: usize,
}

/// Samples dropped from each end of a sorted set of `n`.
#[inline]
pub fn trim_count(n: usize) -> usize {
    (n / 10).max(1)
}

/// Trimmed mean and population standard deviation.
///
/// # Panics
///
/// Panics if `samples` is empty.
pub fn trimmed_stats(samples: &[f64]) -> TrimmedStats {
    assert!(!samples.is_empty(), "Cannot summarize empty sample set");

    let n = samples.len();
    if n < MIN_TRIM_SAMPLES {
        return TrimmedStats {
            mean: samples.iter().sum::<f64>() / n as f64,
            std_dev: 0.0,
            trim_count: 0,
            retained: n,
        };
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    trimmed_stats_sorted(&sorted)
}

fn trimmed_stats_sorted(sorted: &[f64]) -> TrimmedStats {
    let trim = trim_count(sorted.len());
    let kept = &sorted[trim..sorted.len() - trim];
    let (mean, std_dev) = mean_and_population_std(kept);
    TrimmedStats {
        mean,
        std_dev,
        trim_count: trim,
        retained: kept.len(),
    }
}

fn mean_and_population_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Everything reported about one set of timing samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Number of samples.
    pub count: usize,
    /// Trimmed mean in milliseconds.
    pub mean_ms: f64,
    /// Trimmed population standard deviation in milliseconds.
    pub std_dev_ms: f64,
    /// Samples dropped from each end before the mean was taken.
    pub trim_count: usize,
    /// Median in milliseconds.
    pub median_ms: f64,
    /// Fastest sample over the untrimmed set.
    pub min_ms: f64,
    /// Slowest sample over the untrimmed set.
    pub max_ms: f64,
    /// 95th percentile (R-7) in milliseconds.
    pub p95_ms: f64,
}

impl SampleSummary {
    /// Summarize timing samples.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is empty.
    pub fn from_samples(samples: &[f64]) -> Self {
        assert!(!samples.is_empty(), "Cannot summarize empty sample set");

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let trimmed = if sorted.len() < MIN_TRIM_SAMPLES {
            trimmed_stats(samples)
        } else {
            trimmed_stats_sorted(&sorted)
        };

        Self {
            count: sorted.len(),
            mean_ms: trimmed.mean,
            std_dev_ms: trimmed.std_dev,
            trim_count: trimmed.trim_count,
            median_ms: median_sorted(&sorted),
            min_ms: sorted[0],
            max_ms: sorted[sorted.len() - 1],
            p95_ms: percentile_sorted(&sorted, 0.95),
        }
    }
}

/// Bytes in one MiB, the unit behind "MB/s".
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// `length / (ms / 1000) / MiB`; zero for a non-positive elapsed time.
pub fn throughput_mbps(length_bytes: usize, time_ms: f64) -> f64 {
    if time_ms <= 0.0 {
        return 0.0;
    }
    length_bytes as f64 / (time_ms / 1000.0) / BYTES_PER_MB
}

/// `bytes_scanned / (ms / 1000)`; zero for a non-positive elapsed time.
pub fn bytes_per_second(bytes_scanned: usize, time_ms: f64) -> f64 {
    if time_ms <= 0.0 {
        return 0.0;
    }
    bytes_scanned as f64 / (time_ms / 1000.0)
}
