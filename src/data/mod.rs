//! Dataset reshaping: category normalization and per-category grouping.

pub mod categories;

pub use categories::*;
