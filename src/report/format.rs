//! Formatted terminal output for the CLI.
//!
//! Formatting lives here so the engine stays free of presentation concerns.

use chrono::NaiveDateTime;

use crate::data::City;
use crate::domain::{BehaviorProfile, CityTier, GeoPoint, Industry, NearbyEntity, NearbyResult, PresenceSample};
use crate::report::seed::SeedTable;

const BAR_WIDTH: f64 = 40.0;

pub fn format_rate(sample: &PresenceSample, city: Option<&City>) -> String {
    let mut out = String::new();
    out.push_str("=== presence - working rate ===\n");
    out.push_str(&format!("At: {} (weekday {})\n", sample.timestamp, sample.weekday));
    out.push_str(&format!(
        "City: {} | overtime index {:.2}\n",
        city.map_or("-", |c| c.name),
        sample.overtime_index
    ));
    out.push_str(&format!("Industry: {}\n", industry_label(sample.industry)));
    if sample.is_holiday {
        out.push_str("Holiday: yes\n");
    }
    out.push_str(&format!("Working rate: {:.4} ({:.1}%)\n", sample.working_rate, sample.working_rate * 100.0));
    out
}

/// Hourly curve as a horizontal bar chart.
pub fn format_curve(at: NaiveDateTime, curve: &[f64; 24]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Hourly curve for {}:\n", at.date()));
    for (hour, rate) in curve.iter().enumerate() {
        let bar = "#".repeat((rate * BAR_WIDTH).round() as usize);
        out.push_str(&format!("{hour:02}:00 {:>6.1}% {bar}\n", rate * 100.0));
    }
    out
}

pub fn format_nearby(result: &NearbyResult, center: GeoPoint, radius_m: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== presence - nearby ({:.5}, {:.5}) r={:.0}m ===\n",
        center.lat, center.lon, radius_m
    ));
    out.push_str(&format!(
        "Returned: {} | authentic={} synthetic={} | area estimate={}\n",
        result.entities.len(),
        result.authentic_count,
        result.synthetic_count,
        result.estimated_area_total
    ));
    out.push_str(&format!(
        "\n{:<10} {:<22} {:>9} {:<8} {}\n",
        "kind", "id", "dist_m", "status", "detail"
    ));
    for entity in &result.entities {
        let (kind, detail) = match entity {
            NearbyEntity::Authentic { entity, .. } => ("authentic", entity.category.clone()),
            NearbyEntity::Synthetic(s) => ("synthetic", format!("{} / {}", s.implied_city, s.industry.label())),
        };
        out.push_str(&format!(
            "{:<10} {:<22} {:>9.1} {:<8} {}\n",
            kind,
            entity.id(),
            entity.distance_m(),
            entity.status().label(),
            detail
        ));
    }
    out
}

pub fn format_ratio(authentic_count: u64, ratio: f64, required: Option<(usize, usize)>) -> String {
    let mut out = format!("Authentic: {authentic_count} | target synthetic ratio: {ratio:.2}\n");
    if let Some((target_total, needed)) = required {
        out.push_str(&format!("Synthetic to add for a list of {target_total}: {needed}\n"));
    }
    out
}

pub fn format_estimate(
    center: GeoPoint,
    radius_m: f64,
    city: Option<&City>,
    area_total: u64,
    active: u64,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Area: ({:.5}, {:.5}) r={:.0}m | city: {}\n",
        center.lat,
        center.lon,
        radius_m,
        city.map_or("none within 100 km", |c| c.name)
    ));
    out.push_str(&format!("Working-age residents: {area_total}\n"));
    out.push_str(&format!("Estimated still working: {active}\n"));
    out
}

pub fn format_density(tier: CityTier, hour: u32, is_weekend: bool, factor: f64) -> String {
    format!(
        "Density factor ({}, {:02}:00, {}): {:.3}\n",
        tier.label(),
        hour % 24,
        if is_weekend { "weekend" } else { "weekday" },
        factor
    )
}

pub fn format_profile(profile: &BehaviorProfile) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== presence - behavior profile ({}) ===\n",
        if profile.is_fallback { "fallback" } else { "learned" }
    ));
    out.push_str(&format!(
        "Computed: {} | rows: {}\n",
        profile.computed_at, profile.sample_size
    ));
    let a = &profile.averages;
    out.push_str(&format!(
        "Averages: length={:.1} likes={:.2} comments={:.2} posts/day={:.2}\n",
        a.content_length, a.likes, a.comments, a.posts_per_day
    ));

    if let Some((hour, _)) = profile
        .hour_histogram
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
    {
        out.push_str(&format!("Busiest hour: {hour:02}:00\n"));
    }

    out.push_str("\nTop cities:\n");
    for (city, weight) in profile.city_histogram.iter().take(10) {
        out.push_str(&format!("  {city:<14} {weight:>8.2}\n"));
    }
    out.push_str("\nIndustries:\n");
    for (industry, weight) in &profile.industry_histogram {
        out.push_str(&format!("  {:<14} {weight:>8.2}\n", industry.label()));
    }
    out.push_str("\nCategories:\n");
    for (category, weight) in &profile.category_histogram {
        out.push_str(&format!("  {category:<14} {weight:>8.2}\n"));
    }
    out
}

/// Per-city peak summary of a seed table.
pub fn format_seed_summary(table: &SeedTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== presence - seed report {} (r={:.0}m, limit={}) ===\n",
        table.date, table.radius_m, table.limit
    ));
    out.push_str(&format!(
        "{:<12} {:<11} {:>5} {:>7} {:>7} {:>9} {:>10}\n",
        "city", "tier", "peak", "rate", "density", "synthetic", "active"
    ));
    for row in table.peak_hours() {
        out.push_str(&format!(
            "{:<12} {:<11} {:02}:00 {:>7.3} {:>7.3} {:>9} {:>10}\n",
            row.city,
            row.tier.label(),
            row.hour,
            row.working_rate,
            row.density_factor,
            row.synthetic_working,
            row.estimated_active
        ));
    }
    out
}

fn industry_label(industry: Option<Industry>) -> &'static str {
    industry.map_or("-", Industry::label)
}
