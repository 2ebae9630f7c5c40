//! Main `CharBench` entry point and builder.

use std::time::Instant;

use crate::buffer::{content_rng, generate_with_mode, AlignedBuffer};
use crate::config::{Config, ContentMode, MIN_LENGTH};
use crate::error::Result;
use crate::kernel::{CounterKernel, Counts, LANE_WIDTH};
use crate::measurement::{Collector, Timer};
use crate::result::{
    describe_size, AlignmentCheck, BenchmarkResult, ComparisonResult, Metadata,
    PerformanceMetrics, Sweep, SweepFailure, SweepRow,
};
use crate::statistics::{bytes_per_second, throughput_mbps, SampleSummary};
use crate::validation::validate;

/// Buffer sizes visited by a cache-behavior sweep: 1 KiB up to 32 MiB.
pub const DEFAULT_SWEEP_SIZES: [usize; 6] = [
    1 << 10,
    32 << 10,
    256 << 10,
    1 << 20,
    8 << 20,
    32 << 20,
];

/// Repetitions per size in a sweep.
pub const SWEEP_REPETITIONS: usize = 20;

/// A mean below this many clock ticks is flagged as unreliable.
const MIN_TICKS_PER_RUN: f64 = 10.0;

/// Main entry point for counting benchmarks.
///
/// Use the builder pattern to configure, then call [`run`](Self::run),
/// [`compare`](Self::compare) or [`sweep`](Self::sweep).
///
/// # Example
///
/// ```no_run
/// use lanecount::{CharBench, CounterKernel};
///
/// let result = CharBench::new()
///     .length(1 << 16)
///     .target(b'e')
///     .repetitions(50)
///     .run(CounterKernel::Vectorized)
///     .unwrap();
/// println!("{:.3} ms", result.summary.mean_ms);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CharBench {
    config: Config,
}

impl CharBench {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Small buffer and few repetitions, for smoke tests.
    ///
    /// Settings:
    /// - 64 KiB buffer (vs 1 MiB default)
    /// - 5 repetitions (vs 10 default)
    /// - 1 warm-up run (vs 3 default)
    pub fn quick() -> Self {
        Self::with_config(Config {
            length: 64 << 10,
            repetitions: 5,
            warmup: 1,
            ..Config::default()
        })
    }

    /// Larger buffer and more repetitions for stable numbers.
    ///
    /// Settings:
    /// - 16 MiB buffer
    /// - 100 repetitions
    /// - 10 warm-up runs
    pub fn thorough() -> Self {
        Self::with_config(Config {
            length: 16 << 20,
            repetitions: 100,
            warmup: 10,
            ..Config::default()
        })
    }

    /// Apply `LANECOUNT_*` overrides from the environment.
    pub fn from_env(mut self) -> Self {
        self.config = self.config.from_env();
        self
    }

    /// Set buffer length, sentinel included.
    pub fn length(mut self, n: usize) -> Self {
        self.config.length = n;
        self
    }

    /// Set buffer start alignment.
    pub fn alignment(mut self, n: usize) -> Self {
        self.config.alignment = n;
        self
    }

    /// Set timed repetitions.
    pub fn repetitions(mut self, n: usize) -> Self {
        self.config.repetitions = n;
        self
    }

    /// Set warm-up runs.
    pub fn warmup(mut self, n: usize) -> Self {
        self.config.warmup = n;
        self
    }

    /// Set the content seed.
    pub fn seed(mut self, seed: u32) -> Self {
        self.config.seed = seed;
        self
    }

    /// Count a single byte value.
    pub fn target(mut self, target: u8) -> Self {
        self.config.target = Some(target);
        self
    }

    /// Build a full frequency table instead of counting one byte.
    pub fn frequency_table(mut self) -> Self {
        self.config.target = None;
        self
    }

    /// Set how buffer content is drawn.
    pub fn mode(mut self, mode: ContentMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the kernel used by [`sweep`](Self::sweep) and
    /// [`run_configured`](Self::run_configured).
    pub fn variant(mut self, kernel: CounterKernel) -> Self {
        self.config.variant = kernel;
        self
    }

    /// Print progress lines while measuring.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate the configuration and generate its buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) for a bad
    /// configuration, [`Error::AllocationFailure`](crate::Error::AllocationFailure)
    /// if the buffer cannot be allocated.
    pub fn generate_buffer(&self) -> Result<AlignedBuffer> {
        self.config.validate()?;
        generate_with_mode(
            self.config.length,
            self.config.alignment,
            self.config.mode,
            &mut content_rng(self.config.seed),
        )
    }

    /// Benchmark `kernel` on a freshly generated buffer.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or allocation failure.
    pub fn run(&self, kernel: CounterKernel) -> Result<BenchmarkResult> {
        let buffer = self.generate_buffer()?;
        Ok(self.measure(kernel, &buffer, &Timer::new(), Instant::now(), true))
    }

    /// Benchmark the kernel chosen with [`variant`](Self::variant).
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_configured(&self) -> Result<BenchmarkResult> {
        self.run(self.config.variant)
    }

    /// Benchmark `kernel` on a caller-supplied buffer.
    ///
    /// The buffer's own length and alignment are reported and the result is
    /// marked as not generated, so the configured seed and content mode are
    /// not attributed to it. Target, repetitions and warm-up still apply.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the
    /// configuration is invalid.
    pub fn run_on(&self, kernel: CounterKernel, buffer: &AlignedBuffer) -> Result<BenchmarkResult> {
        self.config.validate()?;
        Ok(self.measure(kernel, buffer, &Timer::new(), Instant::now(), false))
    }

    /// Run both kernels on the same buffer, then check they agree.
    ///
    /// # Errors
    ///
    /// [`Error::CorrectnessMismatch`](crate::Error::CorrectnessMismatch) if
    /// the kernels disagree; the timings are discarded.
    pub fn compare(&self) -> Result<ComparisonResult> {
        let buffer = self.generate_buffer()?;
        let timer = Timer::new();

        let scalar = self.measure(CounterKernel::Scalar, &buffer, &timer, Instant::now(), true);
        let vectorized =
            self.measure(CounterKernel::Vectorized, &buffer, &timer, Instant::now(), true);
        validate(&scalar.metrics.counts, &vectorized.metrics.counts, &buffer)?;

        Ok(ComparisonResult { scalar, vectorized })
    }

    /// Measure the configured kernel across buffer sizes.
    ///
    /// Uses [`SWEEP_REPETITIONS`] per size. The configured length is replaced
    /// by each size, so only sizes are length-checked; a size that fails to
    /// generate is reported and skipped. Distinct counts come from a frequency table
    /// built once per size outside the timed region.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the
    /// alignment or warm-up configuration is invalid.
    pub fn sweep(&self, sizes: &[usize]) -> Result<Sweep> {
        let base = Config {
            length: MIN_LENGTH.max(self.config.length),
            repetitions: SWEEP_REPETITIONS,
            ..self.config.clone()
        };
        base.validate()?;

        let kernel = base.variant;
        let timer = Timer::new();
        let mut rows = Vec::with_capacity(sizes.len());
        let mut failures = Vec::new();

        for &length in sizes {
            let bench = CharBench::with_config(Config {
                length,
                ..base.clone()
            });
            match bench.generate_buffer() {
                Ok(buffer) => {
                    let result = bench.measure(kernel, &buffer, &timer, Instant::now(), true);
                    let distinct = kernel.frequency_table(&buffer).distinct();
                    rows.push(SweepRow {
                        length,
                        avg_ms: result.summary.mean_ms,
                        throughput_mbps: result.throughput_mbps(),
                        distinct,
                        bytes_per_sec: result.bytes_per_second(),
                    });
                }
                Err(e) => {
                    eprintln!(
                        "[lanecount] sweep: skipping {}: {}",
                        describe_size(length),
                        e
                    );
                    failures.push(SweepFailure {
                        length,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(Sweep {
            kernel,
            alignment: base.alignment,
            repetitions: base.repetitions,
            rows,
            failures,
        })
    }

    /// Sweep over [`DEFAULT_SWEEP_SIZES`].
    ///
    /// # Errors
    ///
    /// Same as [`sweep`](Self::sweep).
    pub fn sweep_default(&self) -> Result<Sweep> {
        self.sweep(&DEFAULT_SWEEP_SIZES)
    }

    fn measure(
        &self,
        kernel: CounterKernel,
        buffer: &AlignedBuffer,
        timer: &Timer,
        start: Instant,
        generated: bool,
    ) -> BenchmarkResult {
        let target = self.config.target;
        let collector = Collector::with_timer(timer.clone(), self.config.warmup)
            .verbose(self.config.verbose);
        let measurement = collector.collect(self.config.repetitions, || kernel.run(buffer, target));

        // repetitions >= 1 after validation, so a result always exists.
        let counts = measurement
            .result
            .unwrap_or_else(|| kernel.run(buffer, target));
        let samples = measurement.samples;
        let summary = SampleSummary::from_samples(&samples);

        let alignment_check = AlignmentCheck::of(buffer);
        if !alignment_check.passed() {
            eprintln!(
                "[lanecount] buffer at {:#x} is not {}-byte aligned",
                alignment_check.address, alignment_check.alignment
            );
        }
        warn_on_samples(&samples, &summary, timer.resolution_ms());

        if self.config.verbose {
            report_progress(kernel, &counts, buffer.len(), &summary);
        }

        BenchmarkResult {
            config: Config {
                length: buffer.len(),
                alignment: buffer.alignment(),
                variant: kernel,
                ..self.config.clone()
            },
            metrics: PerformanceMetrics::from_parts(kernel, buffer, samples[0], counts),
            summary,
            samples,
            alignment_check,
            metadata: Metadata {
                lane_width: LANE_WIDTH,
                timer_resolution_ms: timer.resolution_ms(),
                runtime_secs: start.elapsed().as_secs_f64(),
                generated,
            },
        }
    }
}

fn warn_on_samples(samples: &[f64], summary: &SampleSummary, resolution_ms: f64) {
    let zero = samples.iter().filter(|&&ms| ms <= 0.0).count();
    if zero > 0 {
        eprintln!(
            "[lanecount] {} of {} samples measured zero time; throughput for those runs is reported as 0",
            zero,
            samples.len()
        );
    }
    if resolution_ms > 0.0 && summary.mean_ms < resolution_ms * MIN_TICKS_PER_RUN {
        eprintln!(
            "[lanecount] mean {:.6} ms is within {} ticks of the clock resolution ({:.6} ms); increase the length",
            summary.mean_ms, MIN_TICKS_PER_RUN, resolution_ms
        );
    }
}

fn report_progress(kernel: CounterKernel, counts: &Counts, length: usize, summary: &SampleSummary) {
    match counts {
        Counts::Occurrences { count, .. } => eprintln!(
            "[lanecount] {}: {} occurrences, {:.4} ms, {:.2} MB/s",
            kernel,
            count,
            summary.mean_ms,
            throughput_mbps(length, summary.mean_ms)
        ),
        Counts::Table(table) => eprintln!(
            "[lanecount] {}: {} distinct values, {:.4} ms, {:.0} bytes/s",
            kernel,
            table.distinct(),
            summary.mean_ms,
            bytes_per_second(length.saturating_sub(1), summary.mean_ms)
        ),
    }
}
