//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::config::ContentMode;
use crate::kernel::Counts;
use crate::result::{describe_size, BenchmarkResult, ComparisonResult, Sweep};
use crate::validation::format_byte;

/// Rows shown in the top-values list unless every value is requested.
const TOP_VALUES: usize = 10;

fn separator() -> String {
    "\u{2500}".repeat(62)
}

fn format_mode(mode: ContentMode) -> String {
    match mode {
        ContentMode::Printable => "printable".to_string(),
        ContentMode::Mixed => "mixed multi-byte".to_string(),
        ContentMode::Biased { target, frequency } => {
            format!("biased ({} at {:.1}%)", format_byte(target), frequency * 100.0)
        }
    }
}

/// Format a BenchmarkResult for human-readable terminal output.
pub fn format_result(result: &BenchmarkResult) -> String {
    let mut output = String::new();
    let sep = separator();
    let m = &result.metrics;
    let s = &result.summary;

    output.push_str(&format!("lanecount: {} kernel\n", m.kernel));
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    let origin = if result.metadata.generated {
        format_mode(result.config.mode)
    } else {
        "caller-supplied".to_string()
    };
    output.push_str(&format!(
        "  Buffer:      {} ({} bytes, {} scanned), {}\n",
        describe_size(m.length),
        m.length,
        m.bytes_scanned,
        origin
    ));
    if result.metadata.generated {
        output.push_str(&format!(
            "  Repetitions: {} (+{} warm-up), seed {}\n",
            s.count, result.config.warmup, result.config.seed
        ));
    } else {
        output.push_str(&format!(
            "  Repetitions: {} (+{} warm-up)\n",
            s.count, result.config.warmup
        ));
    }

    let check = &result.alignment_check;
    let verdict = if check.passed() {
        "\u{2713} aligned".green().to_string()
    } else {
        "\u{2717} misaligned".red().bold().to_string()
    };
    output.push_str(&format!(
        "  Alignment:   {} bytes at {:#x} (address % alignment = {}) {}\n",
        check.alignment, check.address, check.remainder, verdict
    ));
    output.push('\n');

    match &m.counts {
        Counts::Occurrences { target, count } => {
            output.push_str(&format!(
                "  {}\n\n",
                format!("{} occurrences of {}", count, format_byte(*target)).bold()
            ));
        }
        Counts::Table(table) => {
            output.push_str(&format!(
                "  {}\n",
                format!("{} distinct byte values", table.distinct()).bold()
            ));
            if let Some(density) = result.density_percent() {
                output.push_str(&format!("    Character density: {:.6}%\n", density));
            }
            let entries = table.by_frequency();
            let shown = if result.config.show_detailed_frequency {
                entries.len()
            } else {
                entries.len().min(TOP_VALUES)
            };
            output.push_str(&format!("    Most frequent ({} of {}):\n", shown, entries.len()));
            for &(byte, count) in entries.iter().take(shown) {
                output.push_str(&format!(
                    "      {:<14} {:>10}  {:>8.4}%\n",
                    format_byte(byte),
                    count,
                    table.percent(byte, m.bytes_scanned)
                ));
            }
            output.push('\n');
        }
    }

    output.push_str(&format!(
        "    Time:       {:.6} ms \u{00B1} {:.6} ms (trimmed {} per side)\n",
        s.mean_ms, s.std_dev_ms, s.trim_count
    ));
    output.push_str(&format!(
        "    Median:     {:.6} ms   p95: {:.6} ms\n",
        s.median_ms, s.p95_ms
    ));
    output.push_str(&format!(
        "    Range:      {:.6} \u{2013} {:.6} ms\n",
        s.min_ms, s.max_ms
    ));
    output.push_str(&format!(
        "    Throughput: {} ({:.0} bytes/s)\n",
        format!("{:.2} MB/s", result.throughput_mbps()).cyan(),
        result.bytes_per_second()
    ));
    output.push('\n');

    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Timer resolution {:.6} ms, runtime {:.3} s\n",
        result.metadata.timer_resolution_ms, result.metadata.runtime_secs
    ));

    output
}

/// Format a ComparisonResult as a side-by-side table with the speedup.
pub fn format_comparison(cmp: &ComparisonResult) -> String {
    let mut output = String::new();
    let sep = separator();

    output.push_str("lanecount: scalar vs vectorized\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    output.push_str(&format!(
        "  Buffer: {} bytes, alignment {}\n",
        cmp.scalar.metrics.length, cmp.scalar.metrics.alignment
    ));
    output.push_str(&format!(
        "  {}\n\n",
        "\u{2713} Kernels agree".green().bold()
    ));

    output.push_str(&format!(
        "    {:<12} {:>14} {:>14} {:>14}\n",
        "Kernel", "Mean (ms)", "Median (ms)", "MB/s"
    ));
    for r in [&cmp.scalar, &cmp.vectorized] {
        output.push_str(&format!(
            "    {:<12} {:>14.6} {:>14.6} {:>14.2}\n",
            r.kernel().name(),
            r.summary.mean_ms,
            r.summary.median_ms,
            r.throughput_mbps()
        ));
    }
    output.push('\n');

    let speedup = cmp.speedup();
    let label = format!("{:.2}x", speedup);
    let colored = if speedup >= 1.0 {
        label.green().bold()
    } else {
        label.yellow().bold()
    };
    output.push_str(&format!("    Speedup: {}\n\n", colored));

    output.push_str(&sep);
    output.push('\n');
    output.push_str("Note: Speedup is scalar mean time over vectorized mean time.\n");

    output
}

/// Format a cache-behavior sweep, one line per size.
pub fn format_sweep(sweep: &Sweep) -> String {
    let mut output = String::new();
    let sep = separator();

    output.push_str(&format!(
        "lanecount: cache sweep ({} kernel, alignment {}, {} repetitions)\n",
        sweep.kernel, sweep.alignment, sweep.repetitions
    ));
    output.push_str(&sep);
    output.push('\n');

    output.push_str(&format!(
        "    {:<8} {:>14} {:>12} {:>10} {:>16}\n",
        "Size", "Avg (ms)", "MB/s", "Distinct", "bytes/s"
    ));
    for row in &sweep.rows {
        output.push_str(&format!(
            "    {:<8} {:>14.6} {:>12.2} {:>10} {:>16.0}\n",
            describe_size(row.length),
            row.avg_ms,
            row.throughput_mbps,
            row.distinct,
            row.bytes_per_sec
        ));
    }
    for failure in &sweep.failures {
        output.push_str(&format!(
            "    {:<8} {}\n",
            describe_size(failure.length),
            format!("skipped: {}", failure.error).red()
        ));
    }

    output.push_str(&sep);
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::CounterKernel;
    use crate::result::{SweepFailure, SweepRow};
    use crate::CharBench;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_single_target() {
        plain();
        let result = CharBench::new()
            .length(2048)
            .repetitions(3)
            .warmup(0)
            .target(b'a')
            .run(CounterKernel::Scalar)
            .unwrap();
        let output = format_result(&result);
        assert!(output.contains("lanecount: Scalar kernel"));
        assert!(output.contains("occurrences of 0x61 ('a')"));
        assert!(output.contains("\u{2713} aligned"));
        assert!(output.contains("MB/s"));
    }

    #[test]
    fn test_format_caller_buffer() {
        plain();
        let buffer = crate::AlignedBuffer::from_content(b"zzz", 16).unwrap();
        let mut result = CharBench::new()
            .repetitions(2)
            .warmup(0)
            .seed(4242)
            .target(b'z')
            .run_on(CounterKernel::Scalar, &buffer)
            .unwrap();
        result.config.target = None;
        let output = format_result(&result);
        assert!(output.contains("caller-supplied"));
        assert!(!output.contains("seed 4242"));
        assert!(!output.contains("printable"));
        assert!(output.contains("3 occurrences of 0x7a ('z')"));
    }

    #[test]
    fn test_format_table_limits_rows() {
        plain();
        let bench = CharBench::new()
            .length(4096)
            .repetitions(2)
            .warmup(0)
            .frequency_table();
        let result = bench.run(CounterKernel::Vectorized).unwrap();
        let output = format_result(&result);
        assert!(output.contains("distinct byte values"));
        assert!(output.contains("Most frequent (10 of"));
    }

    #[test]
    fn test_format_comparison() {
        plain();
        let cmp = CharBench::quick().target(b'q').compare().unwrap();
        let output = format_comparison(&cmp);
        assert!(output.contains("Kernels agree"));
        assert!(output.contains("Speedup:"));
        assert!(output.contains("Scalar"));
        assert!(output.contains("Vectorized"));
    }

    #[test]
    fn test_format_sweep() {
        plain();
        let sweep = Sweep {
            kernel: CounterKernel::Vectorized,
            alignment: 32,
            repetitions: 20,
            rows: vec![SweepRow {
                length: 32 << 10,
                avg_ms: 0.01,
                throughput_mbps: 3125.0,
                distinct: 95,
                bytes_per_sec: 3.2e9,
            }],
            failures: vec![SweepFailure {
                length: 8,
                error: "invalid argument: too short".to_string(),
            }],
        };
        let output = format_sweep(&sweep);
        assert!(output.contains("32KB"));
        assert!(output.contains("skipped: invalid argument"));
    }
}
