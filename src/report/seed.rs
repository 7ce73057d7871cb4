//! Offline seeding table: per city and hour, how busy the area looks and how
//! much synthetic filler a cold-start nearby list would carry.
//!
//! Cities are evaluated in parallel; row order is city-table order, then hour.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use serde::Serialize;

use crate::blend::PopulationBlendController;
use crate::data::{CITIES, CalendarContext, City};
use crate::domain::CityTier;
use crate::error::AppError;
use crate::geo::{GeospatialSynthesis, density_factor};
use crate::models::compute_working_rate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedRow {
    pub city: &'static str,
    pub tier: CityTier,
    pub hour: u32,
    pub working_rate: f64,
    pub density_factor: f64,
    /// Synthetic entities a nearby list with no authentic hits would get.
    pub synthetic_topup: usize,
    /// Expected working share of that top-up.
    pub synthetic_working: usize,
    pub estimated_active: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedTable {
    pub date: NaiveDate,
    pub radius_m: f64,
    pub limit: usize,
    pub rows: Vec<SeedRow>,
}

impl SeedTable {
    /// Busiest hour per city, by estimated active count (earliest on ties).
    pub fn peak_hours(&self) -> Vec<&SeedRow> {
        let mut peaks: Vec<&SeedRow> = Vec::new();
        for row in &self.rows {
            match peaks.last_mut() {
                Some(peak) if peak.city == row.city => {
                    if row.estimated_active > peak.estimated_active {
                        *peak = row;
                    }
                }
                _ => peaks.push(row),
            }
        }
        peaks
    }
}

pub fn build_seed_table(
    date: NaiveDate,
    radius_m: f64,
    limit: usize,
    blend: &PopulationBlendController,
    geo: &GeospatialSynthesis,
) -> SeedTable {
    let radius_m = geo.clamp_radius(radius_m);
    let limit = geo.clamp_limit(limit);
    let synthetic_topup = blend.required_synthetic_count(0, 0, limit);

    let rows: Vec<SeedRow> = CITIES
        .par_iter()
        .flat_map_iter(|city| {
            (0u32..24).filter_map(move |hour| {
                let at = date.and_hms_opt(hour, 0, 0)?;
                Some(seed_row(city, at, hour, radius_m, synthetic_topup, geo))
            })
        })
        .collect();

    SeedTable {
        date,
        radius_m,
        limit,
        rows,
    }
}

fn seed_row(
    city: &City,
    at: NaiveDateTime,
    hour: u32,
    radius_m: f64,
    synthetic_topup: usize,
    geo: &GeospatialSynthesis,
) -> SeedRow {
    let ctx = CalendarContext::resolve(at);
    let working_rate = compute_working_rate(at, city.overtime_index, None, false);
    SeedRow {
        city: city.name,
        tier: city.tier,
        hour,
        working_rate,
        density_factor: density_factor(city.tier, hour, !ctx.is_workday()),
        synthetic_topup,
        synthetic_working: (synthetic_topup as f64 * working_rate).round() as usize,
        estimated_active: geo.estimate_active_nearby(city.position(), radius_m, at),
    }
}

/// Write the table as pretty-printed JSON.
pub fn export_seed_table(path: &Path, table: &SeedTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create seed export '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), table)
        .map_err(|e| AppError::io(format!("Failed to write seed export '{}': {e}", path.display())))
}
