//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - classification enums (`Industry`, `CityTier`, `WorkStatus`)
//! - geometry (`GeoPoint`, `BoundingBox`)
//! - entities and query results (`AuthenticEntity`, `SyntheticEntity`, `NearbyResult`)
//! - learned behavior (`ActivityRow`, `BehaviorProfile`)

pub mod types;

pub use types::*;
