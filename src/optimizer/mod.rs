//! Bounded one-dimensional search used to calibrate the dual martingale
//! correction.

pub mod golden_section;

pub use golden_section::{golden_section_search, SearchOutcome};
