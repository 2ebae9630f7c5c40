//! Fixed-width lane kernels.
//!
//! Each step loads [`LANE_WIDTH`] bytes, compares them against the target
//! broadcast across the lane, collapses the per-lane equality mask into a
//! 16-bit integer and adds its popcount. Bytes past the last full lane are
//! handled by the scalar loop, which never reads beyond the content slice.
//!
//! - **x86_64**: SSE2 (`pcmpeqb` + `pmovmskb`), part of the baseline ISA
//! - **other targets**: the same mask built lane by lane in plain Rust

use super::{scalar, FrequencyTable};

/// Bytes compared per vector step.
pub const LANE_WIDTH: usize = 16;

/// Count bytes equal to `target`, [`LANE_WIDTH`] bytes per step.
#[inline]
pub fn count(content: &[u8], target: u8) -> usize {
    #[cfg(target_arch = "x86_64")]
    {
        // SAFETY: SSE2 is part of the x86_64 baseline.
        unsafe { count_sse2(content, target) }
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        count_portable(content, target)
    }
}

/// Build a frequency table by vector-counting each byte value present.
///
/// A scalar pass first collects the distinct values, then [`count`] runs
/// once per value. Cost is `O(len * distinct)` rather than `O(len)`: cheap
/// for narrow alphabets such as printable text, roughly 95x a single scan
/// for uniform printable content and up to 256x for arbitrary bytes.
pub fn frequency_table(content: &[u8]) -> FrequencyTable {
    let mut present = [false; 256];
    for &b in content {
        present[b as usize] = true;
    }

    let mut table = FrequencyTable::new();
    for (value, &seen) in present.iter().enumerate() {
        if seen {
            let byte = value as u8;
            table.set(byte, count(content, byte));
        }
    }
    table
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn count_sse2(content: &[u8], target: u8) -> usize {
    use std::arch::x86_64::*;

    let len = content.len();
    let ptr = content.as_ptr();
    let needle = _mm_set1_epi8(target as i8);
    let mut total = 0usize;
    let mut i = 0;

    while i + LANE_WIDTH <= len {
        let block = _mm_loadu_si128(ptr.add(i) as *const __m128i);
        let eq = _mm_cmpeq_epi8(block, needle);
        let mask = _mm_movemask_epi8(eq) as u32;
        total += mask.count_ones() as usize;
        i += LANE_WIDTH;
    }

    total + scalar::count(&content[i..], target)
}

/// Lane-emulated kernel with the same mask/popcount structure.
#[cfg_attr(target_arch = "x86_64", allow(dead_code))]
pub(crate) fn count_portable(content: &[u8], target: u8) -> usize {
    let mut chunks = content.chunks_exact(LANE_WIDTH);
    let mut total = 0usize;
    for chunk in &mut chunks {
        total += lane_mask(chunk, target).count_ones() as usize;
    }
    total + scalar::count(chunks.remainder(), target)
}

/// Bit `i` set iff `lane[i] == target`.
#[cfg_attr(target_arch = "x86_64", allow(dead_code))]
#[inline]
fn lane_mask(lane: &[u8], target: u8) -> u16 {
    let mut mask = 0u16;
    for (i, &b) in lane.iter().enumerate() {
        mask |= u16::from(b == target) << i;
    }
    mask
}
