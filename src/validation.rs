//! Cross-checking the scalar and vectorized kernels.
//!
//! Any divergence is a kernel defect, never a runtime condition to recover
//! from. A failed check produces [`Error::CorrectnessMismatch`] carrying both
//! counts and a window of buffer bytes from around the midpoint for manual
//! inspection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::AlignedBuffer;
use crate::error::{Error, Result};
use crate::kernel::{CounterKernel, Counts, FrequencyTable};

/// Bytes of content captured in a mismatch diagnostic.
pub const EXCERPT_LEN: usize = 32;

/// Diagnostic context for a scalar/vectorized disagreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Byte value whose count diverged (the target, or the first differing
    /// table key).
    pub byte: u8,
    /// Whether the divergence came from a full frequency table.
    pub table_mode: bool,
    /// Scalar kernel's count.
    pub scalar: usize,
    /// Vectorized kernel's count.
    pub vectorized: usize,
    /// Buffer length, sentinel included.
    pub buffer_len: usize,
    /// Offset of the first excerpt byte within the buffer.
    pub excerpt_offset: usize,
    /// Raw content bytes near the midpoint.
    pub excerpt: Vec<u8>,
}

impl Mismatch {
    fn new(byte: u8, table_mode: bool, scalar: usize, vectorized: usize, content: &[u8]) -> Self {
        let (excerpt_offset, excerpt) = midpoint_excerpt(content, EXCERPT_LEN);
        Self {
            byte,
            table_mode,
            scalar,
            vectorized,
            buffer_len: content.len() + 1,
            excerpt_offset,
            excerpt: excerpt.to_vec(),
        }
    }

    /// Excerpt rendered with printable bytes as-is and everything else as `\xNN`.
    pub fn excerpt_display(&self) -> String {
        escape_bytes(&self.excerpt)
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = if self.table_mode {
            "frequency table entry"
        } else {
            "target"
        };
        write!(
            f,
            "correctness mismatch on {} {}: scalar={} vectorized={} (buffer {} bytes); \
             content at offset {}: \"{}\"",
            what,
            format_byte(self.byte),
            self.scalar,
            self.vectorized,
            self.buffer_len,
            self.excerpt_offset,
            self.excerpt_display()
        )
    }
}

/// Up to `width` bytes of `content` centered on its midpoint.
pub fn midpoint_excerpt(content: &[u8], width: usize) -> (usize, &[u8]) {
    let width = width.min(content.len());
    let start = (content.len() / 2).saturating_sub(width / 2);
    let start = start.min(content.len() - width);
    (start, &content[start..start + width])
}

/// `0x62 ('b')` for printable bytes, `0x01` otherwise.
pub fn format_byte(byte: u8) -> String {
    if (0x20..=0x7E).contains(&byte) {
        format!("{:#04x} ('{}')", byte, byte as char)
    } else {
        format!("{:#04x}", byte)
    }
}

/// Printable ASCII kept, backslash and quote escaped, anything else as `\xNN`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out
}

fn fail(mismatch: Mismatch) -> Error {
    eprintln!("[lanecount] {}", mismatch);
    Error::CorrectnessMismatch(Box::new(mismatch))
}

/// Compare two single-target counts for the same buffer.
///
/// # Errors
///
/// [`Error::CorrectnessMismatch`] when the counts differ.
pub fn validate_count(
    scalar: usize,
    vectorized: usize,
    buffer: &AlignedBuffer,
    target: u8,
) -> Result<()> {
    if scalar == vectorized {
        return Ok(());
    }
    Err(fail(Mismatch::new(
        target,
        false,
        scalar,
        vectorized,
        buffer.content(),
    )))
}

/// Compare two frequency tables for the same buffer, key by key.
///
/// # Errors
///
/// [`Error::CorrectnessMismatch`] naming the lowest differing byte value.
pub fn validate_table(
    scalar: &FrequencyTable,
    vectorized: &FrequencyTable,
    buffer: &AlignedBuffer,
) -> Result<()> {
    match scalar.first_difference(vectorized) {
        None => Ok(()),
        Some(byte) => Err(fail(Mismatch::new(
            byte,
            true,
            scalar.get(byte),
            vectorized.get(byte),
            buffer.content(),
        ))),
    }
}

/// Compare results of the two kernels, in whichever mode they were run.
///
/// # Errors
///
/// [`Error::CorrectnessMismatch`] on any divergence.
/// [`Error::InvalidArgument`] if the two results are of different modes
/// or count different targets.
pub fn validate(scalar: &Counts, vectorized: &Counts, buffer: &AlignedBuffer) -> Result<()> {
    match (scalar, vectorized) {
        (
            Counts::Occurrences { target: ts, count: s },
            Counts::Occurrences { target: tv, count: v },
        ) if ts == tv => validate_count(*s, *v, buffer, *ts),
        (Counts::Table(s), Counts::Table(v)) => validate_table(s, v, buffer),
        _ => Err(Error::invalid(
            "cannot compare results from different counting modes",
        )),
    }
}

/// Run both kernels on `buffer` and check that they agree.
///
/// Returns the agreed result.
///
/// # Errors
///
/// [`Error::CorrectnessMismatch`] on any divergence.
pub fn cross_check(buffer: &AlignedBuffer, target: Option<u8>) -> Result<Counts> {
    let scalar = CounterKernel::Scalar.run(buffer, target);
    let vectorized = CounterKernel::Vectorized.run(buffer, target);
    validate(&scalar, &vectorized, buffer)?;
    Ok(vectorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::scalar;

    fn fixture() -> AlignedBuffer {
        AlignedBuffer::from_content(b"aabbbcca", 8).unwrap()
    }

    #[test]
    fn test_validate_count_pass() {
        assert!(validate_count(3, 3, &fixture(), b'b').is_ok());
    }

    #[test]
    fn test_validate_count_fail_carries_context() {
        let err = validate_count(3, 4, &fixture(), b'b').unwrap_err();
        match err {
            Error::CorrectnessMismatch(m) => {
                assert_eq!(m.byte, b'b');
                assert_eq!(m.scalar, 3);
                assert_eq!(m.vectorized, 4);
                assert_eq!(m.buffer_len, 9);
                assert_eq!(m.excerpt, b"aabbbcca");
                assert!(!m.table_mode);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_validate_table_reports_first_difference() {
        let s = scalar::frequency_table(b"aabbbcca");
        let mut v = s.clone();
        v.set(b'c', 5);
        let err = validate_table(&s, &v, &fixture()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("frequency table entry 0x63 ('c')"), "{}", msg);
        assert!(msg.contains("scalar=2 vectorized=5"), "{}", msg);
    }

    #[test]
    fn test_validate_mode_mix_is_invalid() {
        let a = Counts::Occurrences {
            target: b'a',
            count: 3,
        };
        let b = Counts::Table(FrequencyTable::new());
        assert!(matches!(
            validate(&a, &b, &fixture()),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_cross_check_agrees() {
        let buf = fixture();
        assert_eq!(cross_check(&buf, Some(b'a')).unwrap().occurrences(), Some(3));
        let table = cross_check(&buf, None).unwrap();
        assert_eq!(table.table().map(|t| t.total()), Some(8));
    }

    #[test]
    fn test_midpoint_excerpt() {
        let data: Vec<u8> = (0..100).collect();
        let (offset, window) = midpoint_excerpt(&data, 32);
        assert_eq!(offset, 34);
        assert_eq!(window.len(), 32);
        assert_eq!(window[0], 34);

        let (offset, window) = midpoint_excerpt(b"abc", 32);
        assert_eq!(offset, 0);
        assert_eq!(window, b"abc");

        let (offset, window) = midpoint_excerpt(b"", 32);
        assert_eq!((offset, window.len()), (0, 0));
    }

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(b"a\"b\\c"), "a\\\"b\\\\c");
        assert_eq!(escape_bytes(&[0x00, 0xC3, b'z']), "\\x00\\xc3z");
    }
}
