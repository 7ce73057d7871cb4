//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - loads and validates the engine config
//! - builds the engine over a fixture store when a command needs one
//! - prints reports and writes optional exports

use chrono::Local;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use crate::cli::{
    Cli, Command, DensityArgs, EstimateArgs, NearbyArgs, ProfileArgs, RateArgs, RatioArgs,
    SeedReportArgs,
};
use crate::config::EngineConfig;
use crate::data::find_city;
use crate::domain::NearbyQuery;
use crate::error::AppError;
use crate::geo::density_factor;
use crate::models::{hourly_curve, sample};
use crate::report;
use crate::store::PresenceStore;

pub mod pipeline;

/// Entry point for the `presence` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Rate(args) => handle_rate(args),
        Command::Density(args) => handle_density(args),
        Command::Nearby(args) => handle_nearby(args, EngineConfig::load(config_path)?),
        Command::Ratio(args) => handle_ratio(args, EngineConfig::load(config_path)?),
        Command::Estimate(args) => handle_estimate(args, EngineConfig::load(config_path)?),
        Command::Profile(args) => handle_profile(args, EngineConfig::load(config_path)?),
        Command::SeedReport(args) => handle_seed_report(args, EngineConfig::load(config_path)?),
    }
}

/// Trace-level under `--debug`, otherwise whatever `RUST_LOG` asks for.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::from_default_env()
    };
    // A second init (e.g. from an embedding host) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_rate(args: RateArgs) -> Result<(), AppError> {
    let at = args.at.unwrap_or_else(|| Local::now().naive_local());
    let city = args
        .city
        .as_deref()
        .map(|name| {
            find_city(name).ok_or_else(|| AppError::invalid_input(format!("Unknown city '{name}'.")))
        })
        .transpose()?;

    let overtime_index = match (args.overtime, city) {
        (Some(oi), _) if !oi.is_finite() => {
            return Err(AppError::invalid_input(format!("Overtime index must be finite, got {oi}.")));
        }
        (Some(oi), _) => oi,
        (None, Some(city)) => city.overtime_index,
        (None, None) => 1.0,
    };

    let s = sample(at, overtime_index, args.industry, args.fluctuation);
    print!("{}", report::format_rate(&s, city));
    if args.curve {
        let curve = hourly_curve(at, overtime_index, args.industry);
        print!("\n{}", report::format_curve(at, &curve));
    }
    Ok(())
}

fn handle_density(args: DensityArgs) -> Result<(), AppError> {
    let factor = density_factor(args.tier, args.hour, args.weekend);
    print!("{}", report::format_density(args.tier, args.hour, args.weekend, factor));
    Ok(())
}

fn handle_nearby(args: NearbyArgs, config: EngineConfig) -> Result<(), AppError> {
    let center = pipeline::parse_center(args.lat, args.lon)?;
    let engine = pipeline::build_engine(config, args.fixture.as_deref(), args.at)?;

    let query = NearbyQuery {
        center,
        radius_meters: args.radius,
        limit: args.limit,
        include_synthetic: !args.no_synthetic,
    };
    let mut result = match args.seed {
        Some(seed) => engine.nearby_with(&query, &mut StdRng::seed_from_u64(seed))?,
        None => engine.nearby(&query)?,
    };
    if args.ranked {
        result.entities = engine.rank_mixed(result.entities);
    }

    let radius = engine.geo().clamp_radius(args.radius);
    print!("{}", report::format_nearby(&result, center, radius));
    Ok(())
}

fn handle_ratio(args: RatioArgs, config: EngineConfig) -> Result<(), AppError> {
    let engine = pipeline::build_engine(config, args.fixture.as_deref(), None)?;

    let (authentic, ratio) = match args.authentic {
        Some(n) => (n, engine.target_synthetic_ratio(n)),
        None => {
            let n = engine.store().count_authentic()?;
            (n, engine.community_target_ratio()?)
        }
    };
    let required = args.total.map(|total| {
        let authentic = usize::try_from(authentic).unwrap_or(usize::MAX);
        let needed = engine
            .blend()
            .required_synthetic_count(authentic, args.current_synthetic, total);
        (total, needed)
    });

    print!("{}", report::format_ratio(authentic, ratio, required));
    Ok(())
}

fn handle_estimate(args: EstimateArgs, config: EngineConfig) -> Result<(), AppError> {
    let center = pipeline::parse_center(args.lat, args.lon)?;
    let engine = pipeline::build_engine(config, None, args.at)?;

    let radius = engine.geo().clamp_radius(args.radius);
    let total = engine.estimated_area_total(center, radius);
    let active = engine.estimate_active_nearby(center, radius);
    print!(
        "{}",
        report::format_estimate(center, radius, engine.resolve_city(center), total, active)
    );
    Ok(())
}

fn handle_profile(args: ProfileArgs, config: EngineConfig) -> Result<(), AppError> {
    let engine = pipeline::build_engine(config, Some(args.fixture.as_path()), args.at)?;
    let profile = engine.behavior_profile();

    if args.json {
        let json = serde_json::to_string_pretty(profile.as_ref())
            .map_err(|e| AppError::io(format!("Failed to serialize profile: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", report::format_profile(&profile));
    }
    Ok(())
}

fn handle_seed_report(args: SeedReportArgs, config: EngineConfig) -> Result<(), AppError> {
    let engine = pipeline::build_engine(config, None, args.at)?;
    let table = report::build_seed_table(
        engine.now().date(),
        args.radius,
        args.limit,
        engine.blend(),
        engine.geo(),
    );

    print!("{}", report::format_seed_summary(&table));
    if let Some(path) = &args.export {
        report::export_seed_table(path, &table)?;
        println!("Wrote {} rows to {}", table.rows.len(), path.display());
    }
    Ok(())
}
