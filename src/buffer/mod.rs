//! Aligned buffer allocation and deterministic content generation.
//!
//! This module provides:
//! - [`AlignedBuffer`], an owning handle pairing a raw allocation with the
//!   offset of its first aligned byte
//! - Seeded fill routines for the three content modes
//!
//! # Layout
//!
//! A buffer of `length` bytes reserves `length + alignment - 1` raw bytes so
//! that some address inside the reservation is a multiple of `alignment` with
//! `length` bytes of room ahead of it. The last usable byte is a zero sentinel
//! that no kernel ever counts.
//!
//! # Determinism
//!
//! Content is a pure function of `(length, mode, seed)`: the stream is a
//! `Xoshiro256PlusPlus` seeded from the 32-bit seed and owned by the caller,
//! never a shared global engine.

mod aligned;
mod generator;

pub use aligned::AlignedBuffer;
pub use generator::{
    content_rng, fill_biased, fill_mixed, fill_printable, generate, generate_with_mode,
    ContentRng, MULTIBYTE_PROBABILITY, PRINTABLE_MAX, PRINTABLE_MIN,
};
