use chrono::{DateTime, Utc};

use crate::elements::SatelliteRecord;
use crate::visibility::geometry::geodetic_to_ecef;
use crate::visibility::propagator::Propagator;

/// Reports a fixed Earth-fixed position with zero sidereal angle, so the
/// returned TEME vector is the ECEF one.
pub(crate) struct FixedPropagator(pub Option<[f64; 3]>);

impl FixedPropagator {
    pub(crate) fn at_geodetic(lat_deg: f64, lon_deg: f64, alt_km: f64) -> Self {
        Self(Some(geodetic_to_ecef(
            lat_deg.to_radians(),
            lon_deg.to_radians(),
            alt_km,
        )))
    }
}

impl Propagator for FixedPropagator {
    fn propagate(&self, _record: &SatelliteRecord, _at: DateTime<Utc>) -> Option<[f64; 3]> {
        self.0
    }

    fn sidereal_time(&self, _at: DateTime<Utc>) -> f64 {
        0.0
    }
}

pub(crate) fn record(norad_id: u32) -> SatelliteRecord {
    SatelliteRecord {
        norad_id,
        name: format!("SAT {}", norad_id),
        line1: String::new(),
        line2: String::new(),
    }
}
