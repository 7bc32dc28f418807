pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

/// Free-space path loss constant for km and GHz.
const FSPL_KM_GHZ_DB: f64 = 32.44;

pub fn free_space_path_loss_db(range_km: f64, frequency_ghz: f64) -> f64 {
    FSPL_KM_GHZ_DB + 20.0 * range_km.log10() + 20.0 * frequency_ghz.log10()
}

/// Ground radius of the circle from which the satellite is seen at or above
/// `min_elevation_deg`, on a spherical Earth.
pub fn coverage_radius_km(altitude_km: f64, min_elevation_deg: f64) -> f64 {
    if min_elevation_deg >= 90.0 || !altitude_km.is_finite() || altitude_km <= 0.0 {
        return 0.0;
    }

    let elev = min_elevation_deg.to_radians();
    let ratio = (EARTH_MEAN_RADIUS_KM * elev.cos() / (EARTH_MEAN_RADIUS_KM + altitude_km))
        .clamp(-1.0, 1.0);
    let central_angle = ratio.acos() - elev;
    (EARTH_MEAN_RADIUS_KM * central_angle).max(0.0)
}
