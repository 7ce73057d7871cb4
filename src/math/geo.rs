//! Great-circle distance and bounding-box prefilters.
//!
//! The bounding box is a cheap storage-side prune. Callers must still apply the
//! exact Haversine filter, since the box corners lie outside the circle.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::domain::{BoundingBox, GeoPoint};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Floor for `cos(lat)` so the longitude span stays finite near the poles.
const MIN_COS_LAT: f64 = 0.01;

/// Widening applied to the box so it covers the Haversine circle, which uses
/// ~111 195 m per degree.
const BBOX_PADDING: f64 = 1.002;

/// Haversine distance between two points, in meters.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `h` marginally above 1 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_M * c
}

/// Degree-space box enclosing the circle of `radius_m` around `center`.
///
/// Every point within `radius_m` by [`haversine_m`] lies inside the box. A
/// circle that reaches a pole spans all longitudes.
pub fn bounding_box(center: GeoPoint, radius_m: f64) -> BoundingBox {
    let d_lat = radius_m / METERS_PER_DEGREE * BBOX_PADDING;
    let cos_lat = center.lat.to_radians().cos().abs().max(MIN_COS_LAT);
    let flat_d_lon = radius_m / (METERS_PER_DEGREE * cos_lat) * BBOX_PADDING;
    let d_lon = match cap_half_width_deg(center.lat, radius_m) {
        Some(cap) => flat_d_lon.max(cap * BBOX_PADDING),
        None => 180.0,
    };

    BoundingBox {
        min_lat: center.lat - d_lat,
        max_lat: center.lat + d_lat,
        min_lon: center.lon - d_lon,
        max_lon: center.lon + d_lon,
    }
}

/// Largest longitude offset reached by the spherical cap, or `None` when the
/// cap contains a pole.
fn cap_half_width_deg(lat: f64, radius_m: f64) -> Option<f64> {
    let angular = radius_m / EARTH_RADIUS_M;
    let ratio = angular.sin() / lat.to_radians().cos();
    (angular < FRAC_PI_2 && (0.0..1.0).contains(&ratio)).then(|| ratio.asin().to_degrees())
}

/// Area of a circle with the given radius, in square kilometers.
pub fn circle_area_km2(radius_m: f64) -> f64 {
    let r_km = radius_m / 1000.0;
    PI * r_km * r_km
}
