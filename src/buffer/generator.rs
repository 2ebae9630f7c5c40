//! Seeded content generation for aligned buffers.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::aligned::AlignedBuffer;
use crate::config::ContentMode;
use crate::error::Result;

/// Stream algorithm behind every generated buffer.
pub type ContentRng = Xoshiro256PlusPlus;

/// Lowest printable byte (space).
pub const PRINTABLE_MIN: u8 = 0x20;

/// Highest printable byte (`~`).
pub const PRINTABLE_MAX: u8 = 0x7E;

/// Chance that a position in mixed mode starts a multi-byte run.
pub const MULTIBYTE_PROBABILITY: f64 = 0.25;

const LEAD_MIN: u8 = 0xC2;
const LEAD_MAX: u8 = 0xF4;
const CONTINUATION_MIN: u8 = 0x80;
const CONTINUATION_MAX: u8 = 0xBF;

/// Create the content stream for a 32-bit seed.
///
/// Each call returns an independent stream, so the same seed always yields
/// the same bytes regardless of what was generated before.
pub fn content_rng(seed: u32) -> ContentRng {
    Xoshiro256PlusPlus::seed_from_u64(u64::from(seed))
}

/// Generate a printable buffer of `length` bytes (sentinel included) at
/// `alignment`, fully determined by `seed`.
///
/// # Errors
///
/// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `alignment`
/// is not a power of two or `length` is zero;
/// [`Error::AllocationFailure`](crate::Error::AllocationFailure) if the raw
/// region cannot be obtained.
pub fn generate(length: usize, alignment: usize, seed: u32) -> Result<AlignedBuffer> {
    generate_with_mode(
        length,
        alignment,
        ContentMode::Printable,
        &mut content_rng(seed),
    )
}

/// Generate a buffer using an explicit content mode and a caller-owned stream.
///
/// # Errors
///
/// [`Error::InvalidArgument`](crate::Error::InvalidArgument) for a biased
/// frequency outside `[0, 1]` (NaN included), a non-power-of-two
/// alignment or a zero length, all checked before allocating.
pub fn generate_with_mode<R: Rng + ?Sized>(
    length: usize,
    alignment: usize,
    mode: ContentMode,
    rng: &mut R,
) -> Result<AlignedBuffer> {
    mode.validate()?;
    let mut buffer = AlignedBuffer::allocate(length, alignment)?;
    let content = buffer.content_mut();
    match mode {
        ContentMode::Printable => fill_printable(content, rng),
        ContentMode::Mixed => fill_mixed(content, rng),
        ContentMode::Biased { target, frequency } => fill_biased(content, target, frequency, rng),
    }
    // The sentinel stays zero from the zeroed allocation.
    debug_assert_eq!(buffer.as_slice()[length - 1], 0);
    Ok(buffer)
}

#[inline]
fn printable<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.random_range(PRINTABLE_MIN..=PRINTABLE_MAX)
}

/// Fill `content` with bytes uniform in `[0x20, 0x7E]`.
pub fn fill_printable<R: Rng + ?Sized>(content: &mut [u8], rng: &mut R) {
    for byte in content.iter_mut() {
        *byte = printable(rng);
    }
}

/// Fill `content` with printable bytes and UTF-8-shaped multi-byte runs.
///
/// A run whose lead byte announces more bytes than remain in `content` is
/// abandoned and a single printable byte is written in its place.
pub fn fill_mixed<R: Rng + ?Sized>(content: &mut [u8], rng: &mut R) {
    let len = content.len();
    let mut i = 0;
    while i < len {
        if rng.random::<f64>() < MULTIBYTE_PROBABILITY {
            let lead = rng.random_range(LEAD_MIN..=LEAD_MAX);
            let run = run_length(lead);
            if i + run <= len {
                content[i] = lead;
                for slot in &mut content[i + 1..i + run] {
                    *slot = rng.random_range(CONTINUATION_MIN..=CONTINUATION_MAX);
                }
                i += run;
                continue;
            }
        }
        content[i] = printable(rng);
        i += 1;
    }
}

/// Fill `content` so that each position holds `target` with probability
/// `frequency`; every other position is a printable byte distinct from
/// `target`.
pub fn fill_biased<R: Rng + ?Sized>(content: &mut [u8], target: u8, frequency: f64, rng: &mut R) {
    for byte in content.iter_mut() {
        *byte = if rng.random::<f64>() < frequency {
            target
        } else {
            loop {
                let candidate = printable(rng);
                if candidate != target {
                    break candidate;
                }
            }
        };
    }
}

/// Total bytes in a run introduced by `lead`.
fn run_length(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}
