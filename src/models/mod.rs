//! Temporal presence model.
//!
//! Models are implemented as small, pure functions so that every other
//! component can call them per entity without caching.

pub mod legacy;
pub mod presence;

pub use legacy::baseline_working_rate;
pub use presence::*;
