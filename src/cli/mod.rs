//! Command-line parsing for the `presence` binary.
//!
//! Argument parsing and dispatch stay separate from the engine; coordinate
//! range checks happen in [`crate::app`] so they surface as `InvalidInput`.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};

use crate::domain::{CityTier, Industry};

/// Accepted `--at` layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "presence", version, about = "Synthetic workforce presence engine")]
pub struct Cli {
    /// Engine config (TOML). Environment overrides still apply.
    #[arg(long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Trace-level logging to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Working rate at a moment, optionally with the full hourly curve.
    Rate(RateArgs),
    /// Nearby query against a JSON fixture store.
    Nearby(NearbyArgs),
    /// Target synthetic ratio for an authentic population size.
    Ratio(RatioArgs),
    /// Area workforce estimate and the "still working" headline figure.
    Estimate(EstimateArgs),
    /// Density factor for a tier, hour, and day type.
    Density(DensityArgs),
    /// Learned behavior profile of a fixture store.
    Profile(ProfileArgs),
    /// Hourly per-city seeding table.
    SeedReport(SeedReportArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RateArgs {
    /// Local timestamp (defaults to now).
    #[arg(long, value_parser = parse_timestamp)]
    pub at: Option<NaiveDateTime>,

    /// City name from the built-in table; supplies the overtime index.
    #[arg(long, conflicts_with = "overtime")]
    pub city: Option<String>,

    /// Explicit overtime index.
    #[arg(long)]
    pub overtime: Option<f64>,

    #[arg(long, value_enum)]
    pub industry: Option<Industry>,

    /// Add the deterministic per-5-minute fluctuation.
    #[arg(long)]
    pub fluctuation: bool,

    /// Also print the hourly curve for the day.
    #[arg(long)]
    pub curve: bool,
}

#[derive(Debug, Args, Clone)]
pub struct NearbyArgs {
    /// Store fixture (JSON). Without it the store is empty.
    #[arg(long, value_name = "JSON")]
    pub fixture: Option<PathBuf>,

    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Search radius in meters.
    #[arg(long, default_value_t = 1_000.0)]
    pub radius: f64,

    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Authentic entities only.
    #[arg(long)]
    pub no_synthetic: bool,

    /// Apply the jittered authentic-first ranking instead of distance order.
    #[arg(long)]
    pub ranked: bool,

    /// Local timestamp (defaults to now).
    #[arg(long, value_parser = parse_timestamp)]
    pub at: Option<NaiveDateTime>,

    /// Seed the RNG for a reproducible synthetic top-up.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct RatioArgs {
    /// Authentic population size. Defaults to the fixture's count.
    #[arg(long)]
    pub authentic: Option<u64>,

    #[arg(long, value_name = "JSON")]
    pub fixture: Option<PathBuf>,

    /// Also report how many synthetic entities a list of this size needs.
    #[arg(long)]
    pub total: Option<usize>,

    /// Synthetic entities already in the list.
    #[arg(long, default_value_t = 0)]
    pub current_synthetic: usize,
}

#[derive(Debug, Args, Clone)]
pub struct EstimateArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    #[arg(long, default_value_t = 1_000.0)]
    pub radius: f64,

    #[arg(long, value_parser = parse_timestamp)]
    pub at: Option<NaiveDateTime>,
}

#[derive(Debug, Args, Clone)]
pub struct DensityArgs {
    #[arg(long, value_enum, default_value_t = CityTier::Tier2)]
    pub tier: CityTier,

    /// Hour of day (values above 23 wrap).
    #[arg(long)]
    pub hour: u32,

    #[arg(long)]
    pub weekend: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ProfileArgs {
    #[arg(long, value_name = "JSON")]
    pub fixture: PathBuf,

    #[arg(long, value_parser = parse_timestamp)]
    pub at: Option<NaiveDateTime>,

    /// Print the profile as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SeedReportArgs {
    /// Any time on the day to tabulate (defaults to today).
    #[arg(long, value_parser = parse_timestamp)]
    pub at: Option<NaiveDateTime>,

    #[arg(long, default_value_t = 1_000.0)]
    pub radius: f64,

    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Write the full table as JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Parse a local timestamp like `2026-03-10T21:30` or `2026-03-10 21:30:00`.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| format!("'{raw}' is not a timestamp (expected YYYY-MM-DDTHH:MM[:SS])"))
}
