//! Reporting: terminal formatting and the offline seeding table.

pub mod format;
pub mod seed;

pub use format::*;
pub use seed::{SeedRow, SeedTable, build_seed_table, export_seed_table};
