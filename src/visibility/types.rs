use serde::Serialize;

/// Slant range and the free-space loss derived from it. Present together or
/// not at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlantLink {
    pub range_km: f64,
    pub path_loss_db: f64,
}

/// One satellite's geometry and link verdict for one observer and instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedSatellite {
    pub norad_id: u32,
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    #[serde(flatten)]
    pub link: Option<SlantLink>,
    pub coverage_radius_km: f64,
    pub available: bool,
}

#[cfg(test)]
impl EvaluatedSatellite {
    pub fn range_km(&self) -> Option<f64> {
        self.link.map(|l| l.range_km)
    }

    pub fn path_loss_db(&self) -> Option<f64> {
        self.link.map(|l| l.path_loss_db)
    }
}
