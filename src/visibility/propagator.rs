use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::elements::SatelliteRecord;

/// Greenwich mean sidereal time, in radians.
pub fn gmst(at: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()))
}

/// Orbit propagation capability used by the evaluator.
pub trait Propagator: Send + Sync {
    /// TEME position in km, or `None` when the orbit cannot be propagated to
    /// `at` (decayed or invalid elements).
    fn propagate(&self, record: &SatelliteRecord, at: DateTime<Utc>) -> Option<[f64; 3]>;

    /// Earth rotation angle at `at`, in radians.
    fn sidereal_time(&self, at: DateTime<Utc>) -> f64 {
        gmst(at)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn propagate(&self, record: &SatelliteRecord, at: DateTime<Utc>) -> Option<[f64; 3]> {
        let elements = match Elements::from_tle(
            Some(record.name.clone()),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        ) {
            Ok(e) => e,
            Err(e) => {
                log::debug!("Invalid TLE for NORAD {}: {}", record.norad_id, e);
                return None;
            }
        };

        let constants = match Constants::from_elements(&elements) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("Unusable elements for NORAD {}: {}", record.norad_id, e);
                return None;
            }
        };

        let minutes = elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .ok()?;

        match constants.propagate(minutes) {
            Ok(prediction) => Some(prediction.position),
            Err(e) => {
                log::debug!("Propagation failed for NORAD {}: {}", record.norad_id, e);
                None
            }
        }
    }
}
