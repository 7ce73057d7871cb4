//! Mathematical utilities: geodesy, weighted sampling, and deterministic hashing.

pub mod geo;
pub mod hash;
pub mod sampling;

pub use geo::*;
pub use hash::*;
pub use sampling::*;
