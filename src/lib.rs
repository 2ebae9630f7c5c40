//! # lanecount
//!
//! Measure how fast a byte-counting kernel scans memory, and check that the
//! vectorized kernel agrees with the scalar one.
//!
//! The crate covers the whole loop:
//! - Deterministic, aligned test buffers (printable, mixed multi-byte, or
//!   biased toward a target byte), each ending in a zero sentinel
//! - A scalar reference kernel and a 16-lane vectorized kernel for single-byte
//!   counts and full 256-entry frequency tables
//! - Warm-up plus repeated timing with outlier-trimmed statistics
//! - Cross-validation that treats any disagreement as a fatal defect
//!
//! ## Quick Start
//!
//! ```no_run
//! use lanecount::{CharBench, CounterKernel};
//!
//! let cmp = CharBench::new()
//!     .length(1 << 20)
//!     .alignment(32)
//!     .target(b'e')
//!     .compare()
//!     .unwrap();
//!
//! println!("speedup: {:.2}x", cmp.speedup());
//! println!("{}", lanecount::output::format_comparison(&cmp));
//! ```
//!
//! ## Environment
//!
//! [`CharBench::from_env`] merges `LANECOUNT_LENGTH`, `LANECOUNT_ALIGNMENT`,
//! `LANECOUNT_REPETITIONS`, `LANECOUNT_WARMUP`, `LANECOUNT_SEED`,
//! `LANECOUNT_TARGET` and `LANECOUNT_VERBOSE` over the builder's settings.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod bench;
mod config;
mod error;
mod result;

// Functional modules
pub mod buffer;
pub mod kernel;
pub mod measurement;
pub mod output;
pub mod statistics;
pub mod validation;

// Re-exports for public API
pub use bench::{CharBench, DEFAULT_SWEEP_SIZES, SWEEP_REPETITIONS};
pub use buffer::{generate, AlignedBuffer};
pub use config::{is_power_of_two, parse_target, Config, ContentMode, MAX_REPETITIONS, MIN_LENGTH};
pub use error::{Error, Result};
pub use kernel::{ByteCategory, CounterKernel, Counts, FrequencyTable, LANE_WIDTH};
pub use measurement::Timer;
pub use result::{
    describe_size, AlignmentCheck, BenchmarkResult, ComparisonResult, Metadata,
    PerformanceMetrics, RunSample, Sweep, SweepFailure, SweepRow,
};
pub use statistics::SampleSummary;
pub use validation::Mismatch;

/// Convenience function: compare both kernels under `config`.
///
/// Equivalent to `CharBench::with_config(config).compare()`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for a bad configuration,
/// [`Error::AllocationFailure`] if the buffer cannot be obtained, and
/// [`Error::CorrectnessMismatch`] if the kernels disagree.
pub fn compare(config: Config) -> Result<ComparisonResult> {
    CharBench::with_config(config).compare()
}
