//! Byte counting kernels.
//!
//! Two interchangeable implementations share one contract: for any content
//! and any byte value `0..=255`, [`CounterKernel::Scalar`] and
//! [`CounterKernel::Vectorized`] return identical occurrence counts and
//! identical frequency tables. The final sentinel byte of an
//! [`AlignedBuffer`] is never counted.

mod category;
pub mod scalar;
pub mod vectorized;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::AlignedBuffer;

pub use category::ByteCategory;
pub use vectorized::LANE_WIDTH;

/// Kernel variant, selected when a benchmark is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKernel {
    /// One byte compared per step.
    Scalar,
    /// [`LANE_WIDTH`] bytes compared per step with a bitmask popcount.
    Vectorized,
}

impl CounterKernel {
    /// Both variants, scalar first.
    pub const ALL: [CounterKernel; 2] = [CounterKernel::Scalar, CounterKernel::Vectorized];

    /// Display name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            CounterKernel::Scalar => "Scalar",
            CounterKernel::Vectorized => "Vectorized",
        }
    }

    /// Occurrences of `target` in the buffer's content.
    #[inline]
    pub fn count(&self, buffer: &AlignedBuffer, target: u8) -> usize {
        self.count_slice(buffer.content(), target)
    }

    /// Occurrences of `target` in an arbitrary byte slice.
    #[inline]
    pub fn count_slice(&self, content: &[u8], target: u8) -> usize {
        match self {
            CounterKernel::Scalar => scalar::count(content, target),
            CounterKernel::Vectorized => vectorized::count(content, target),
        }
    }

    /// Full byte-value histogram of the buffer's content.
    pub fn frequency_table(&self, buffer: &AlignedBuffer) -> FrequencyTable {
        self.frequency_table_slice(buffer.content())
    }

    /// Full byte-value histogram of an arbitrary byte slice.
    pub fn frequency_table_slice(&self, content: &[u8]) -> FrequencyTable {
        match self {
            CounterKernel::Scalar => scalar::frequency_table(content),
            CounterKernel::Vectorized => vectorized::frequency_table(content),
        }
    }

    /// Run in the mode the target selects: a single count when `Some`,
    /// a table when `None`.
    pub fn run(&self, buffer: &AlignedBuffer, target: Option<u8>) -> Counts {
        match target {
            Some(t) => Counts::Occurrences {
                target: t,
                count: self.count(buffer, t),
            },
            None => Counts::Table(self.frequency_table(buffer)),
        }
    }
}

impl fmt::Display for CounterKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one kernel invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Counts {
    /// Single-target mode.
    Occurrences {
        /// Byte that was counted.
        target: u8,
        /// How many times it occurred.
        count: usize,
    },
    /// Full-table mode.
    Table(FrequencyTable),
}

impl Counts {
    /// Occurrence count in single-target mode.
    pub fn occurrences(&self) -> Option<usize> {
        match self {
            Counts::Occurrences { count, .. } => Some(*count),
            Counts::Table(_) => None,
        }
    }

    /// Byte that was counted in single-target mode.
    pub fn target(&self) -> Option<u8> {
        match self {
            Counts::Occurrences { target, .. } => Some(*target),
            Counts::Table(_) => None,
        }
    }

    /// Frequency table in full-table mode.
    pub fn table(&self) -> Option<&FrequencyTable> {
        match self {
            Counts::Occurrences { .. } => None,
            Counts::Table(table) => Some(table),
        }
    }
}

/// Occurrence count for each of the 256 byte values.
///
/// Keys with a zero count are treated as absent: `iter()` and `distinct()`
/// only see values that actually occurred.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    #[serde(with = "counts_serde")]
    counts: [usize; 256],
}

impl FrequencyTable {
    /// Empty table.
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count for `byte`.
    #[inline]
    pub fn get(&self, byte: u8) -> usize {
        self.counts[byte as usize]
    }

    #[inline]
    pub(crate) fn increment(&mut self, byte: u8) {
        self.counts[byte as usize] += 1;
    }

    #[inline]
    pub(crate) fn set(&mut self, byte: u8, count: usize) {
        self.counts[byte as usize] = count;
    }

    /// Number of byte values with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(byte, count)` for present values in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }

    /// Present values sorted by descending count, ties by ascending byte.
    pub fn by_frequency(&self) -> Vec<(u8, usize)> {
        let mut entries: Vec<(u8, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    /// Share of `total` held by `byte`, in percent. Zero when `total` is zero.
    pub fn percent(&self, byte: u8, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.get(byte) as f64 / total as f64 * 100.0
        }
    }

    /// First byte value whose count differs from `other`, if any.
    pub fn first_difference(&self, other: &FrequencyTable) -> Option<u8> {
        (0..=255u8).find(|&b| self.get(b) != other.get(b))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Serde derives stop at 32-element arrays; go through a slice instead.
mod counts_serde {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(counts: &[usize; 256], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(counts.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[usize; 256], D::Error> {
        let values = Vec::<usize>::deserialize(d)?;
        let len = values.len();
        values
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"256 counts"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> AlignedBuffer {
        AlignedBuffer::from_content(b"aabbbcca", 16).unwrap()
    }

    #[test]
    fn test_variants_agree_on_fixture() {
        let buf = fixture();
        for kernel in CounterKernel::ALL {
            assert_eq!(kernel.count(&buf, b'b'), 3, "{}", kernel);
            assert_eq!(kernel.count(&buf, b'a'), 3, "{}", kernel);
            assert_eq!(kernel.count(&buf, b'z'), 0, "{}", kernel);
        }
    }

    #[test]
    fn test_sentinel_not_counted() {
        let buf = fixture();
        for kernel in CounterKernel::ALL {
            assert_eq!(kernel.count(&buf, 0), 0);
            assert_eq!(kernel.frequency_table(&buf).get(0), 0);
        }
    }

    #[test]
    fn test_frequency_table_keys() {
        let buf = fixture();
        for kernel in CounterKernel::ALL {
            let table = kernel.frequency_table(&buf);
            assert_eq!(table.total(), 8);
            let entries: Vec<(u8, usize)> = table.iter().collect();
            assert_eq!(entries, vec![(b'a', 3), (b'b', 3), (b'c', 2)]);
        }
    }

    #[test]
    fn test_run_modes() {
        let buf = fixture();
        let single = CounterKernel::Vectorized.run(&buf, Some(b'c'));
        assert_eq!(single.occurrences(), Some(2));
        assert_eq!(single.target(), Some(b'c'));
        assert!(single.table().is_none());

        let table = CounterKernel::Scalar.run(&buf, None);
        assert_eq!(table.table().map(|t| t.distinct()), Some(3));
        assert_eq!(table.target(), None);
    }

    #[test]
    fn test_by_frequency_order() {
        let table = scalar::frequency_table(b"cbbbaac");
        assert_eq!(table.by_frequency(), vec![(b'b', 3), (b'a', 2), (b'c', 2)]);
    }

    #[test]
    fn test_percent_and_difference() {
        let a = scalar::frequency_table(b"aabbbcca");
        assert!((a.percent(b'c', 8) - 25.0).abs() < 1e-12);
        assert_eq!(a.percent(b'c', 0), 0.0);

        let b = scalar::frequency_table(b"aabbbccb");
        assert_eq!(a.first_difference(&b), Some(b'a'));
        assert_eq!(a.first_difference(&a.clone()), None);
    }

    #[test]
    fn test_table_serde_roundtrip() {
        let table = scalar::frequency_table(b"hello");
        let json = serde_json::to_string(&table).unwrap();
        let back: FrequencyTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
