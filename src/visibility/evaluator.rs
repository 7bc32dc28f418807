use chrono::{DateTime, Utc};

use crate::constellation::ConstellationConfig;
use crate::elements::SatelliteRecord;
use crate::visibility::geometry::{ecef_to_enu, ecef_to_geodetic, teme_to_ecef_position};
use crate::visibility::link_budget::{coverage_radius_km, free_space_path_loss_db};
use crate::visibility::observer::Observer;
use crate::visibility::propagator::Propagator;
use crate::visibility::types::{EvaluatedSatellite, SlantLink};

/// Evaluate one satellite against one observer at `at`.
///
/// Returns `None` when the propagator has no position for the satellite. A
/// degenerate slant range still yields a result, with no link and
/// `available == false`.
pub fn evaluate(
    record: &SatelliteRecord,
    observer: &Observer,
    config: &ConstellationConfig,
    at: DateTime<Utc>,
    propagator: &dyn Propagator,
) -> Option<EvaluatedSatellite> {
    let position = propagator.propagate(record, at)?;
    if position.iter().any(|c| !c.is_finite()) {
        log::debug!("Non-finite position for NORAD {}", record.norad_id);
        return None;
    }

    let sat_ecef = teme_to_ecef_position(position, propagator.sidereal_time(at));
    let (lat, lon, altitude_km) = ecef_to_geodetic(sat_ecef);

    let sta_ecef = observer.position_ecef_km();
    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let (link, elevation_deg, azimuth_deg) = if range_km.is_finite() && range_km > 0.0 {
        let (east, north, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
        let link = SlantLink {
            range_km,
            path_loss_db: free_space_path_loss_db(range_km, config.frequency_ghz),
        };
        (
            Some(link),
            (up / range_km).clamp(-1.0, 1.0).asin().to_degrees(),
            east.atan2(north).to_degrees().rem_euclid(360.0),
        )
    } else {
        (None, 0.0, 0.0)
    };

    let available = link.is_some_and(|l| {
        elevation_deg > config.min_elevation_deg && l.path_loss_db < config.max_path_loss_db
    });

    Some(EvaluatedSatellite {
        norad_id: record.norad_id,
        name: record.name.clone(),
        latitude_deg: lat.to_degrees(),
        longitude_deg: lon.to_degrees(),
        altitude_km,
        elevation_deg,
        azimuth_deg,
        link,
        coverage_radius_km: coverage_radius_km(altitude_km, config.min_elevation_deg),
        available,
    })
}
