// WGS-84
const WGS84_A_KM: f64 = 6378.137;
const WGS84_E2: f64 = 0.00669437999014;

const GEODETIC_TOLERANCE_RAD: f64 = 1e-12;
const GEODETIC_MAX_ITERATIONS: usize = 20;

/// Rotate a TEME (inertial) position into the Earth-fixed frame.
pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn geodetic_to_ecef(lat_rad: f64, lon_rad: f64, alt_km: f64) -> [f64; 3] {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    [
        (n + alt_km) * cos_lat * cos_lon,
        (n + alt_km) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
    ]
}

/// Inverse of [`geodetic_to_ecef`]: returns `(lat_rad, lon_rad, alt_km)`.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..GEODETIC_MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let next = (z + n * WGS84_E2 * sin_lat).atan2(p);
        let done = (next - lat).abs() < GEODETIC_TOLERANCE_RAD;
        lat = next;
        if done {
            break;
        }
    }

    let sin_lat = lat.sin();
    let alt = p * lat.cos() + z * sin_lat - WGS84_A_KM * (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    (lat, lon, alt)
}

/// Project an Earth-fixed offset onto the observer's local east/north/up axes.
pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}
