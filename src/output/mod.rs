//! Report rendering: colored terminal text, JSON and CSV.

pub mod csv;
pub mod json;
pub mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_comparison, format_result, format_sweep};
