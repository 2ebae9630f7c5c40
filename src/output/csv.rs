//! CSV export of results.
//!
//! Every number is written with six decimals. The character column is
//! quoted, with quotes doubled and non-printable bytes rendered as `\xNN`.

use std::io::{self, Write};

use crate::kernel::{ByteCategory, FrequencyTable};
use crate::result::{BenchmarkResult, Sweep};

/// Header of the single-target summary row.
pub const SUMMARY_HEADER: &str = "StringLength,Alignment,TargetChar,TotalChars,Occurrences,AvgTimeMs,StdDevMs,MinTimeMs,MaxTimeMs,ThroughputMBps,CharsPerSec";

/// Header of the frequency-table summary row.
pub const TABLE_SUMMARY_HEADER: &str = "Implementation,StringLength,Alignment,Repetitions,RandomSeed,TotalChars,UniqueChars,AvgTimeMs,StdDevMs,MinTimeMs,MaxTimeMs,ThroughputMBps,CharsPerSec,CharDensity_Percent";

/// Header of the per-value frequency rows.
pub const FREQUENCY_HEADER: &str = "Character,ASCII_Code,Count,Frequency_Percent";

/// Header of the frequency-ranked rows of a distribution report.
pub const RANKED_HEADER: &str = "Rank,Character,ASCII_Code,Count,Frequency_Percent,Category";

/// Header of the value-ordered rows of a distribution report.
pub const ASCII_SORTED_HEADER: &str = "ASCII_Code,Character,Count,Frequency_Percent,Category";

/// Header of the per-repetition rows.
pub const PER_RUN_HEADER: &str = "Run,ExecutionTime_ms,Throughput_MBps,CharsPerSecond";

/// Header of the cache sweep rows.
pub const SWEEP_HEADER: &str = "StringLength,AvgTimeMs,ThroughputMBps,UniqueChars,CharsPerSec";

/// Quoted CSV cell for a byte value.
pub fn char_cell(byte: u8) -> String {
    match byte {
        b'"' => "\"\"\"\"".to_string(),
        0x20..=0x7E => format!("\"{}\"", byte as char),
        _ => format!("\"\\x{:02x}\"", byte),
    }
}

/// Write the summary header and row for one result.
///
/// Single-target results use [`SUMMARY_HEADER`], frequency-table results
/// [`TABLE_SUMMARY_HEADER`]. The seed cell is left empty for a
/// caller-supplied buffer.
pub fn write_summary<W: Write>(w: &mut W, result: &BenchmarkResult) -> io::Result<()> {
    let m = &result.metrics;
    let s = &result.summary;
    match m.counts.table() {
        None => {
            writeln!(w, "{}", SUMMARY_HEADER)?;
            let target = m.counts.target().map(char_cell).unwrap_or_default();
            writeln!(
                w,
                "{},{},{},{},{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
                m.length,
                m.alignment,
                target,
                m.bytes_scanned,
                m.counts.occurrences().unwrap_or(0),
                s.mean_ms,
                s.std_dev_ms,
                s.min_ms,
                s.max_ms,
                result.throughput_mbps(),
                result.bytes_per_second()
            )
        }
        Some(table) => {
            writeln!(w, "{}", TABLE_SUMMARY_HEADER)?;
            let seed = if result.metadata.generated {
                result.config.seed.to_string()
            } else {
                String::new()
            };
            writeln!(
                w,
                "{},{},{},{},{},{},{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
                m.kernel,
                m.length,
                m.alignment,
                result.config.repetitions,
                seed,
                m.bytes_scanned,
                table.distinct(),
                s.mean_ms,
                s.std_dev_ms,
                s.min_ms,
                s.max_ms,
                result.throughput_mbps(),
                result.bytes_per_second(),
                result.density_percent().unwrap_or(0.0)
            )
        }
    }
}

/// Write one row per timed repetition.
pub fn write_per_run<W: Write>(w: &mut W, result: &BenchmarkResult) -> io::Result<()> {
    writeln!(w, "{}", PER_RUN_HEADER)?;
    for row in result.per_run() {
        writeln!(
            w,
            "{},{:.6},{:.6},{:.6}",
            row.run, row.time_ms, row.throughput_mbps, row.bytes_per_sec
        )?;
    }
    Ok(())
}

/// Write one row per present byte value, ascending by value.
///
/// Percentages are relative to `total_chars`.
pub fn write_frequency<W: Write>(
    w: &mut W,
    table: &FrequencyTable,
    total_chars: usize,
) -> io::Result<()> {
    writeln!(w, "{}", FREQUENCY_HEADER)?;
    for (byte, count) in table.iter() {
        writeln!(
            w,
            "{},{},{},{:.6}",
            char_cell(byte),
            byte,
            count,
            table.percent(byte, total_chars)
        )?;
    }
    Ok(())
}

/// Write a character distribution report: totals, then the present values
/// ranked by count (ties by value), then the same values in value order.
///
/// Percentages are relative to `total_chars`; every row carries its
/// [`ByteCategory`].
pub fn write_distribution<W: Write>(
    w: &mut W,
    table: &FrequencyTable,
    total_chars: usize,
) -> io::Result<()> {
    writeln!(w, "# Character Distribution Analysis")?;
    writeln!(w, "TotalCharacters,{}", total_chars)?;
    writeln!(w, "UniqueCharacters,{}", table.distinct())?;
    writeln!(w)?;

    writeln!(w, "# Frequency Sorted Data")?;
    writeln!(w, "{}", RANKED_HEADER)?;
    for (rank, (byte, count)) in table.by_frequency().into_iter().enumerate() {
        writeln!(
            w,
            "{},{},{},{},{:.6},{}",
            rank + 1,
            char_cell(byte),
            byte,
            count,
            table.percent(byte, total_chars),
            ByteCategory::classify(byte)
        )?;
    }
    writeln!(w)?;

    writeln!(w, "# ASCII Sorted Data")?;
    writeln!(w, "{}", ASCII_SORTED_HEADER)?;
    for (byte, count) in table.iter() {
        writeln!(
            w,
            "{},{},{},{:.6},{}",
            byte,
            char_cell(byte),
            count,
            table.percent(byte, total_chars),
            ByteCategory::classify(byte)
        )?;
    }
    Ok(())
}

/// Write the full export for a result: summary, per-run rows and, in
/// table mode, the frequency rows. Sections are separated by blank lines.
pub fn write_result<W: Write>(w: &mut W, result: &BenchmarkResult) -> io::Result<()> {
    write_summary(w, result)?;
    writeln!(w)?;
    write_per_run(w, result)?;
    if let Some(table) = result.metrics.counts.table() {
        writeln!(w)?;
        write_frequency(w, table, result.metrics.bytes_scanned)?;
    }
    Ok(())
}

/// Write the rows of a cache sweep.
pub fn write_sweep<W: Write>(w: &mut W, sweep: &Sweep) -> io::Result<()> {
    writeln!(w, "{}", SWEEP_HEADER)?;
    for row in &sweep.rows {
        writeln!(
            w,
            "{},{:.6},{:.6},{},{:.6}",
            row.length, row.avg_ms, row.throughput_mbps, row.distinct, row.bytes_per_sec
        )?;
    }
    Ok(())
}

/// [`write_result`] into a `String`.
///
/// # Errors
///
/// Propagates any error from [`write_result`].
pub fn result_to_string(result: &BenchmarkResult) -> io::Result<String> {
    let mut buf = Vec::new();
    write_result(&mut buf, result)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
