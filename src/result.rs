//! Benchmark result types.

use serde::{Deserialize, Serialize};

use crate::buffer::AlignedBuffer;
use crate::config::Config;
use crate::kernel::{CounterKernel, Counts};
use crate::measurement::Timer;
use crate::statistics::{bytes_per_second, throughput_mbps, SampleSummary};

/// Snapshot of a single kernel invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Kernel that produced the counts.
    pub kernel: CounterKernel,
    /// Elapsed time of the invocation in milliseconds.
    pub elapsed_ms: f64,
    /// Buffer length, sentinel included.
    pub length: usize,
    /// Buffer alignment.
    pub alignment: usize,
    /// Bytes examined: `length - 1`.
    pub bytes_scanned: usize,
    /// Occurrence count or frequency table.
    pub counts: Counts,
}

impl PerformanceMetrics {
    /// Time one invocation of `kernel` over `buffer`.
    pub fn capture(
        kernel: CounterKernel,
        buffer: &AlignedBuffer,
        target: Option<u8>,
        timer: &Timer,
    ) -> Self {
        let (elapsed_ms, counts) = timer.measure_ms(|| kernel.run(buffer, target));
        Self::from_parts(kernel, buffer, elapsed_ms, counts)
    }

    pub(crate) fn from_parts(
        kernel: CounterKernel,
        buffer: &AlignedBuffer,
        elapsed_ms: f64,
        counts: Counts,
    ) -> Self {
        Self {
            kernel,
            elapsed_ms,
            length: buffer.len(),
            alignment: buffer.alignment(),
            bytes_scanned: buffer.len() - 1,
            counts,
        }
    }

    /// MB/s over the whole buffer for this invocation.
    pub fn throughput_mbps(&self) -> f64 {
        throughput_mbps(self.length, self.elapsed_ms)
    }

    /// Content bytes per second for this invocation.
    pub fn bytes_per_second(&self) -> f64 {
        bytes_per_second(self.bytes_scanned, self.elapsed_ms)
    }

    /// Distinct byte values seen (table mode only).
    pub fn distinct(&self) -> Option<usize> {
        self.counts.table().map(|t| t.distinct())
    }
}

/// Where the aligned view landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentCheck {
    /// Address of the first usable byte.
    pub address: usize,
    /// Requested alignment.
    pub alignment: usize,
    /// `address % alignment`; zero when the check passes.
    pub remainder: usize,
}

impl AlignmentCheck {
    /// Inspect a buffer.
    pub fn of(buffer: &AlignedBuffer) -> Self {
        Self {
            address: buffer.address(),
            alignment: buffer.alignment(),
            remainder: buffer.address() % buffer.alignment(),
        }
    }

    /// Whether the address is a multiple of the alignment.
    pub fn passed(&self) -> bool {
        self.remainder == 0
    }
}

/// One row of the per-repetition table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSample {
    /// 1-based repetition number.
    pub run: usize,
    /// Elapsed milliseconds.
    pub time_ms: f64,
    /// Throughput of this repetition in MB/s.
    pub throughput_mbps: f64,
    /// Content bytes per second of this repetition.
    pub bytes_per_sec: f64,
}

/// Run metadata for debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Bytes per vector step.
    pub lane_width: usize,
    /// Probed clock resolution in milliseconds.
    pub timer_resolution_ms: f64,
    /// Wall-clock time of the whole run in seconds.
    pub runtime_secs: f64,
    /// Whether the buffer came from the generator. `false` for a
    /// caller-supplied buffer, whose seed and content mode are unknown.
    pub generated: bool,
}

/// Complete result of benchmarking one kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Configuration the run used.
    pub config: Config,
    /// First timed invocation.
    pub metrics: PerformanceMetrics,
    /// Robust summary of all timed repetitions.
    pub summary: SampleSummary,
    /// Raw samples in execution order.
    pub samples: Vec<f64>,
    /// Address check of the buffer the kernel scanned.
    pub alignment_check: AlignmentCheck,
    /// Metadata for debugging.
    pub metadata: Metadata,
}

impl BenchmarkResult {
    /// Kernel that was measured.
    pub fn kernel(&self) -> CounterKernel {
        self.metrics.kernel
    }

    /// Occurrence count in single-target mode.
    pub fn occurrences(&self) -> Option<usize> {
        self.metrics.counts.occurrences()
    }

    /// Throughput at the trimmed mean time.
    pub fn throughput_mbps(&self) -> f64 {
        throughput_mbps(self.metrics.length, self.summary.mean_ms)
    }

    /// Content bytes per second at the trimmed mean time.
    pub fn bytes_per_second(&self) -> f64 {
        bytes_per_second(self.metrics.bytes_scanned, self.summary.mean_ms)
    }

    /// Distinct byte values over bytes scanned, in percent (table mode only).
    pub fn density_percent(&self) -> Option<f64> {
        let distinct = self.metrics.distinct()?;
        if self.metrics.bytes_scanned == 0 {
            return Some(0.0);
        }
        Some(distinct as f64 / self.metrics.bytes_scanned as f64 * 100.0)
    }

    /// Per-repetition times with their derived throughputs.
    pub fn per_run(&self) -> Vec<RunSample> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, &time_ms)| RunSample {
                run: i + 1,
                time_ms,
                throughput_mbps: throughput_mbps(self.metrics.length, time_ms),
                bytes_per_sec: bytes_per_second(self.metrics.bytes_scanned, time_ms),
            })
            .collect()
    }
}

/// Both kernels measured on the same buffer and cross-validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Scalar kernel run.
    pub scalar: BenchmarkResult,
    /// Vectorized kernel run.
    pub vectorized: BenchmarkResult,
}

impl ComparisonResult {
    /// Scalar mean time over vectorized mean time; zero if undefined.
    pub fn speedup(&self) -> f64 {
        if self.vectorized.summary.mean_ms <= 0.0 {
            return 0.0;
        }
        self.scalar.summary.mean_ms / self.vectorized.summary.mean_ms
    }
}

/// One buffer size in a cache-behavior sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Buffer length, sentinel included.
    pub length: usize,
    /// Trimmed mean time in milliseconds.
    pub avg_ms: f64,
    /// Throughput at `avg_ms`.
    pub throughput_mbps: f64,
    /// Distinct byte values in the buffer.
    pub distinct: usize,
    /// Content bytes per second at `avg_ms`.
    pub bytes_per_sec: f64,
}

/// A size that could not be measured during a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepFailure {
    /// Buffer length that failed.
    pub length: usize,
    /// Rendered error.
    pub error: String,
}

/// Cache-behavior sweep across buffer sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sweep {
    /// Kernel measured at every size.
    pub kernel: CounterKernel,
    /// Alignment used at every size.
    pub alignment: usize,
    /// Repetitions per size.
    pub repetitions: usize,
    /// Measured sizes in input order.
    pub rows: Vec<SweepRow>,
    /// Sizes that were skipped.
    pub failures: Vec<SweepFailure>,
}

/// Human-readable size: `512B`, `32KB`, `8MB`.
pub fn describe_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{}MB", bytes / (1024 * 1024))
    }
}
