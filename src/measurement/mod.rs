//! Measurement infrastructure for kernel timing.
//!
//! This module provides:
//! - A monotonic timer reporting fractional milliseconds
//! - A sequential collector that runs warm-up iterations and then records
//!   one sample per repetition, in execution order
//!
//! # Threading
//!
//! Collection is single-threaded and synchronous by construction. Running
//! repetitions on one thread keeps scheduler noise and cross-core cache
//! traffic out of the samples.

mod collector;
mod timer;

pub use collector::{Collector, Measurement};
pub use timer::{black_box, duration_ms, Timer};
