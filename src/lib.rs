//! `presence-engine` library crate.
//!
//! The binary (`presence`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the host API layer can embed [`engine::PresenceEngine`] directly
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod blend;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod geo;
pub mod math;
pub mod models;
pub mod profile;
pub mod report;
pub mod store;

pub use engine::PresenceEngine;
pub use error::AppError;
