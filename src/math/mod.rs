//! Mathematical utilities: least squares and polynomial fitting.

pub mod poly;

pub use poly::*;
