use serde::Serialize;
use std::f64::consts::{PI, TAU};

use crate::visibility::{EvaluatedSatellite, EARTH_MEAN_RADIUS_KM};

/// Golden ratio.
const PHI: f64 = 1.618_033_988_749_895;

/// Finest spacing a heatmap request may ask for.
pub const MIN_POINT_SPACING_KM: f64 = 1.0;

/// Points laid over a single footprint never exceed this.
pub const MAX_POINTS_PER_SATELLITE: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

/// Spread ground points over every satellite's coverage circle.
///
/// Each footprint gets `ceil(π r² / spacing²)` points laid on a golden-angle
/// spiral with `√t` radial scaling, which keeps areal density uniform.
/// The count is capped at [`MAX_POINTS_PER_SATELLITE`]. Overlapping
/// footprints are not deduplicated.
pub fn sample(satellites: &[EvaluatedSatellite], point_spacing_km: f64) -> Vec<HeatmapPoint> {
    if !point_spacing_km.is_finite() || point_spacing_km <= 0.0 {
        log::warn!("Ignoring heatmap request with spacing {} km", point_spacing_km);
        return Vec::new();
    }

    let mut points = Vec::new();
    for sat in satellites {
        let radius = sat.coverage_radius_km;
        if !radius.is_finite() || radius <= 0.0 {
            continue;
        }

        let count = point_count(radius, point_spacing_km).unwrap_or_else(|| {
            log::warn!(
                "Spacing {} km is too fine for a {:.0} km footprint, capping at {} points",
                point_spacing_km,
                radius,
                MAX_POINTS_PER_SATELLITE
            );
            MAX_POINTS_PER_SATELLITE
        });
        points.reserve(count);
        for i in 0..count {
            let t = i as f64 / count as f64;
            let bearing = i as f64 * (TAU / PHI);
            let distance = radius * t.sqrt();
            let (latitude_deg, longitude_deg) =
                destination_point(sat.latitude_deg, sat.longitude_deg, bearing, distance);
            points.push(HeatmapPoint {
                latitude_deg,
                longitude_deg,
            });
        }
    }

    points
}

/// `None` when the area ratio is not finite or exceeds the per-footprint cap.
fn point_count(radius_km: f64, spacing_km: f64) -> Option<usize> {
    let count = (PI * radius_km * radius_km / (spacing_km * spacing_km)).ceil();
    if !count.is_finite() || count > MAX_POINTS_PER_SATELLITE as f64 {
        return None;
    }
    Some(count as usize)
}

/// Spherical direct geodesic: travel `distance_km` from the start along the
/// great circle leaving at `bearing_rad` (clockwise from north).
pub fn destination_point(
    lat_deg: f64,
    lon_deg: f64,
    bearing_rad: f64,
    distance_km: f64,
) -> (f64, f64) {
    let lat1 = lat_deg.to_radians();
    let lon1 = lon_deg.to_radians();
    let delta = distance_km / EARTH_MEAN_RADIUS_KM;

    let sin_lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing_rad.cos())
        .clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon1
        + (bearing_rad.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    (
        lat2.to_degrees().clamp(-90.0, 90.0),
        normalize_longitude(lon2.to_degrees()),
    )
}

/// Wrap into [-180, 180).
fn normalize_longitude(lon_deg: f64) -> f64 {
    let wrapped = (lon_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Haversine distance on the mean-radius sphere.
#[cfg(test)]
fn great_circle_distance_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let phi1 = lat1_deg.to_radians();
    let phi2 = lat2_deg.to_radians();
    let d_phi = (lat2_deg - lat1_deg).to_radians();
    let d_lambda = (lon2_deg - lon1_deg).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_KM * a.sqrt().min(1.0).asin()
}
