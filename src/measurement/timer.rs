//! Monotonic wall-clock timing in fractional milliseconds.
//!
//! Uses `std::time::Instant`, the highest-resolution monotonic clock the
//! platform exposes (`clock_gettime(CLOCK_MONOTONIC)` on Linux,
//! `mach_absolute_time` on macOS, `QueryPerformanceCounter` on Windows).

use std::hint::black_box as std_black_box;
use std::time::{Duration, Instant};

/// Wrapper around `std::hint::black_box` for preventing compiler optimizations.
///
/// Wrap the kernel call being measured so the compiler can neither discard
/// the count nor hoist the scan out of the timed region.
#[inline]
pub fn black_box<T>(x: T) -> T {
    std_black_box(x)
}

/// Convert a duration to fractional milliseconds.
#[inline]
pub fn duration_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Empirically measure clock resolution by finding the minimum non-zero
/// difference between consecutive reads.
fn measure_resolution_ms() -> f64 {
    let mut min_diff = Duration::MAX;

    for _ in 0..1000 {
        let t1 = Instant::now();
        let mut t2 = Instant::now();
        while t2 == t1 {
            t2 = Instant::now();
        }
        let diff = t2 - t1;
        if diff < min_diff {
            min_diff = diff;
        }
    }

    duration_ms(min_diff)
}

/// Timer for measuring a single kernel invocation.
#[derive(Debug, Clone)]
pub struct Timer {
    /// Smallest observable tick in milliseconds.
    resolution_ms: f64,
}

impl Timer {
    /// Create a timer, probing the clock resolution once.
    pub fn new() -> Self {
        Self {
            resolution_ms: measure_resolution_ms(),
        }
    }

    /// Create a timer with a known resolution, skipping the probe.
    pub fn with_resolution_ms(resolution_ms: f64) -> Self {
        Self { resolution_ms }
    }

    /// Estimated clock resolution in milliseconds.
    pub fn resolution_ms(&self) -> f64 {
        self.resolution_ms
    }

    /// Run `f` once and return its elapsed time in milliseconds with its result.
    #[inline]
    pub fn measure_ms<F, T>(&self, f: F) -> (f64, T)
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let out = black_box(f());
        let elapsed = start.elapsed();
        (duration_ms(elapsed), out)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_ms() {
        assert_eq!(duration_ms(Duration::from_millis(3)), 3.0);
        assert!((duration_ms(Duration::from_nanos(1_500)) - 0.0015).abs() < 1e-12);
    }

    #[test]
    fn test_resolution_reasonable() {
        let timer = Timer::new();
        // Below 1 ms on anything that can run the test suite.
        assert!(
            timer.resolution_ms() > 0.0 && timer.resolution_ms() < 1.0,
            "resolution_ms = {}",
            timer.resolution_ms()
        );
    }

    #[test]
    fn test_measure_returns_result() {
        let timer = Timer::with_resolution_ms(1e-6);
        let (ms, sum) = timer.measure_ms(|| {
            let mut sum = 0u64;
            for i in 0..10_000 {
                sum = sum.wrapping_add(black_box(i));
            }
            sum
        });
        assert_eq!(sum, (0..10_000u64).sum::<u64>());
        assert!(ms >= 0.0);
    }
}
