//! Configuration for a counting benchmark run.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kernel::CounterKernel;

/// Smallest buffer length (sentinel included) accepted by the driver.
pub const MIN_LENGTH: usize = 16;

/// Largest repetition count accepted by the driver.
pub const MAX_REPETITIONS: usize = 1000;

/// Validated benchmark parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Buffer length in bytes, including the trailing zero sentinel (default: 1 MiB).
    pub length: usize,

    /// Start alignment of the buffer, a power of two (default: 16).
    pub alignment: usize,

    /// Timed repetitions, in `[1, 1000]` (default: 10).
    pub repetitions: usize,

    /// Untimed warm-up runs before measurement (default: 3).
    pub warmup: usize,

    /// Seed of the content stream (default: 42).
    pub seed: u32,

    /// Byte to count. `None` computes a full frequency table instead.
    pub target: Option<u8>,

    /// How buffer content is drawn (default: `Printable`).
    pub mode: ContentMode,

    /// Kernel used by single-variant runs and sweeps (default: `Vectorized`).
    pub variant: CounterKernel,

    /// Print progress lines while measuring.
    pub verbose: bool,

    /// Reporting hint: emit CSV rows alongside the text report.
    pub export_csv: bool,

    /// Reporting hint: list every byte value in frequency-table mode.
    pub show_detailed_frequency: bool,
}

/// Content drawn into a generated buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContentMode {
    /// Every byte uniform in `[0x20, 0x7E]`.
    Printable,

    /// Printable bytes interleaved with UTF-8-shaped multi-byte runs.
    Mixed,

    /// Printable bytes with `target` injected at roughly `frequency`.
    Biased {
        /// Injected byte.
        target: u8,
        /// Probability in `[0, 1]` that a position holds `target`.
        frequency: f64,
    },
}

impl ContentMode {
    /// Reject a `Biased` frequency outside `[0, 1]`, NaN included.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] naming the frequency.
    pub fn validate(&self) -> Result<()> {
        if let ContentMode::Biased { frequency, .. } = *self {
            if !(0.0..=1.0).contains(&frequency) {
                return Err(Error::invalid(format!(
                    "target frequency {} outside [0, 1]",
                    frequency
                )));
            }
        }
        Ok(())
    }
}

impl Default for ContentMode {
    fn default() -> Self {
        Self::Printable
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            length: 1 << 20,
            alignment: 16,
            repetitions: 10,
            warmup: 3,
            seed: 42,
            target: None,
            mode: ContentMode::Printable,
            variant: CounterKernel::Vectorized,
            verbose: false,
            export_csv: false,
            show_detailed_frequency: false,
        }
    }
}

/// `v` is a power of two iff `v > 0` and `v & (v - 1) == 0`.
#[inline]
pub fn is_power_of_two(v: usize) -> bool {
    v > 0 && (v & (v - 1)) == 0
}

impl Config {
    /// Check every field against the limits the generator and driver enforce.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.length < MIN_LENGTH {
            return Err(Error::invalid(format!(
                "length {} is below the minimum of {} bytes",
                self.length, MIN_LENGTH
            )));
        }
        if !is_power_of_two(self.alignment) {
            return Err(Error::invalid(format!(
                "alignment {} is not a power of two",
                self.alignment
            )));
        }
        if !(1..=MAX_REPETITIONS).contains(&self.repetitions) {
            return Err(Error::invalid(format!(
                "repetitions {} outside [1, {}]",
                self.repetitions, MAX_REPETITIONS
            )));
        }
        self.mode.validate()
    }

    /// Bytes a kernel scans: the buffer minus its sentinel.
    pub fn bytes_scanned(&self) -> usize {
        self.length.saturating_sub(1)
    }

    /// Merge overrides from `LANECOUNT_*` environment variables.
    ///
    /// Unparseable values are ignored; the result still has to pass
    /// [`Config::validate`].
    pub fn from_env(mut self) -> Self {
        if let Some(length) = parse_usize_env("LANECOUNT_LENGTH") {
            self.length = length;
        }
        if let Some(alignment) = parse_usize_env("LANECOUNT_ALIGNMENT") {
            self.alignment = alignment;
        }
        if let Some(reps) = parse_usize_env("LANECOUNT_REPETITIONS") {
            self.repetitions = reps;
        }
        if let Some(warmup) = parse_usize_env("LANECOUNT_WARMUP") {
            self.warmup = warmup;
        }
        if let Some(seed) = parse_u32_env("LANECOUNT_SEED") {
            self.seed = seed;
        }
        if let Some(target) = parse_target_env("LANECOUNT_TARGET") {
            self.target = Some(target);
        }
        if env::var_os("LANECOUNT_VERBOSE").is_some() {
            self.verbose = true;
        }
        self
    }
}

fn parse_usize_env(key: &str) -> Option<usize> {
    env::var(key).ok()?.parse().ok()
}

fn parse_u32_env(key: &str) -> Option<u32> {
    env::var(key).ok()?.parse().ok()
}

fn parse_target_env(key: &str) -> Option<u8> {
    parse_target(&env::var(key).ok()?)
}

/// Parse a target byte: a single ASCII character, a decimal byte value,
/// or a `0x`-prefixed hex byte value.
pub fn parse_target(raw: &str) -> Option<u8> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u8::from_str_radix(hex, 16).ok();
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !c.is_ascii_digit() => Some(c as u8),
        _ => raw.parse().ok(),
    }
}
