//! Sequential sample collection with warm-up.
//!
//! Every run happens on the calling thread, one after another:
//! 1. `warmup` untimed runs settle caches and CPU frequency
//! 2. `repetitions` timed runs, recorded in execution order

use super::timer::{black_box, Timer};

/// Timing samples from one measurement, plus the first measured result.
#[derive(Debug, Clone)]
pub struct Measurement<T> {
    /// Elapsed milliseconds per repetition, in execution order.
    pub samples: Vec<f64>,
    /// Output of the first timed repetition (`None` for zero repetitions).
    pub result: Option<T>,
}

/// Collector for repeated timing of one operation.
#[derive(Debug)]
pub struct Collector {
    /// The timer used for measurements.
    timer: Timer,
    /// Number of warm-up runs before measuring.
    warmup_iterations: usize,
    /// Print progress every 10% for long runs.
    verbose: bool,
}

impl Collector {
    /// Create a collector with the given warm-up runs.
    pub fn new(warmup_iterations: usize) -> Self {
        Self::with_timer(Timer::new(), warmup_iterations)
    }

    /// Create a collector with a pre-probed timer.
    pub fn with_timer(timer: Timer, warmup_iterations: usize) -> Self {
        Self {
            timer,
            warmup_iterations,
            verbose: false,
        }
    }

    /// Enable progress lines on stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get a reference to the internal timer.
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Number of warm-up runs.
    pub fn warmup_iterations(&self) -> usize {
        self.warmup_iterations
    }

    fn warmup<F, T>(&self, f: &mut F)
    where
        F: FnMut() -> T,
    {
        for _ in 0..self.warmup_iterations {
            black_box(f());
        }
    }

    /// Run `f` through warm-up, then time it `repetitions` times.
    ///
    /// Warm-up results and timings are discarded. Only the first timed
    /// result is kept; the operation is expected to be deterministic.
    pub fn collect<F, T>(&self, repetitions: usize, mut f: F) -> Measurement<T>
    where
        F: FnMut() -> T,
    {
        self.warmup(&mut f);

        let mut samples = Vec::with_capacity(repetitions);
        let mut result = None;
        let progress_step = repetitions / 10;

        for rep in 0..repetitions {
            let (ms, out) = self.timer.measure_ms(&mut f);
            samples.push(ms);
            if result.is_none() {
                result = Some(out);
            }

            if self.verbose && repetitions > 10 && (rep + 1) % progress_step == 0 {
                eprintln!(
                    "[lanecount] progress: {}%",
                    (rep + 1) * 100 / repetitions
                );
            }
        }

        Measurement { samples, result }
    }

    /// Timing samples only.
    pub fn measure<F, T>(&self, repetitions: usize, f: F) -> Vec<f64>
    where
        F: FnMut() -> T,
    {
        self.collect(repetitions, f).samples
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast_collector(warmup: usize) -> Collector {
        Collector::with_timer(Timer::with_resolution_ms(1e-6), warmup)
    }

    #[test]
    fn test_warmup_and_repetition_counts() {
        let calls = Cell::new(0usize);
        let collector = fast_collector(5);
        let samples = collector.measure(20, || calls.set(calls.get() + 1));

        assert_eq!(samples.len(), 20);
        assert_eq!(calls.get(), 25);
        assert!(samples.iter().all(|&ms| ms >= 0.0));
    }

    #[test]
    fn test_keeps_first_timed_result() {
        let calls = Cell::new(0usize);
        let collector = fast_collector(3);
        let m = collector.collect(4, || {
            calls.set(calls.get() + 1);
            calls.get()
        });
        // Warm-up consumed calls 1..=3.
        assert_eq!(m.result, Some(4));
        assert_eq!(m.samples.len(), 4);
    }

    #[test]
    fn test_zero_repetitions() {
        let collector = fast_collector(0);
        let m = collector.collect(0, || 1u8);
        assert!(m.samples.is_empty());
        assert!(m.result.is_none());
    }
}
