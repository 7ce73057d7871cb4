//! Authentic/synthetic population blending.

pub mod config;
pub mod controller;

pub use config::{BlendConfig, Milestone};
pub use controller::{PopulationBlendController, Provenance};
