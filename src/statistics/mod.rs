//! Statistical reduction of timing samples.
//!
//! This module provides:
//! - Median and interpolated percentiles over sorted copies of the samples
//! - Trimmed mean and population standard deviation for outlier robustness
//! - Throughput derivations with explicit zero-duration fallbacks
//!
//! Samples arrive in execution order; every statistic here works on a sorted
//! copy and leaves the caller's sequence untouched.

mod quantile;
mod summary;

pub use quantile::{median, percentile};
pub use summary::{
    bytes_per_second, throughput_mbps, trim_count, trimmed_stats, SampleSummary, TrimmedStats,
    BYTES_PER_MB, MIN_TRIM_SAMPLES,
};
