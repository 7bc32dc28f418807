use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::elements::SatelliteRecord;
use crate::visibility::geometry::{ecef_to_geodetic, teme_to_ecef_position};
use crate::visibility::propagator::Propagator;

const MIN_STEP: Duration = Duration::seconds(10);

/// Longest track a single call produces, excluding the closing sample.
pub const MAX_TRACK_POINTS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Ground track over `center ± span / 2`, sampled roughly `points` times but
/// never closer than ten seconds apart and never more than
/// [`MAX_TRACK_POINTS`] intervals. Instants that fail to propagate are left
/// out; a window outside the representable date range yields no track.
pub fn orbit_track(
    record: &SatelliteRecord,
    center: DateTime<Utc>,
    span: Duration,
    points: u32,
    propagator: &dyn Propagator,
) -> Vec<TrackPoint> {
    let points = points.clamp(1, MAX_TRACK_POINTS) as i32;
    let step = (span / points)
        .max(span / MAX_TRACK_POINTS as i32)
        .max(MIN_STEP);
    let (Some(mut cursor), Some(end)) = (
        center.checked_sub_signed(span / 2),
        center.checked_add_signed(span / 2),
    ) else {
        log::warn!("Track window of {} around {} is out of range", span, center);
        return Vec::new();
    };
    let mut track = Vec::new();

    while cursor <= end {
        if let Some(position) = propagator.propagate(record, cursor) {
            let ecef = teme_to_ecef_position(position, propagator.sidereal_time(cursor));
            let (lat, lon, alt) = ecef_to_geodetic(ecef);
            track.push(TrackPoint {
                timestamp: cursor,
                latitude_deg: lat.to_degrees(),
                longitude_deg: lon.to_degrees(),
                altitude_km: alt,
            });
        }
        match cursor.checked_add_signed(step) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    track
}
