//! Geospatial synthesis: nearby queries, area estimates, density factor.

pub mod density;
pub mod synthesis;

pub use density::{LABOR_PARTICIPATION, density_factor, estimated_area_total, hour_band};
pub use synthesis::GeospatialSynthesis;
