use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constellation::Constellation;
use crate::heatmap::HeatmapPoint;
use crate::visibility::{EvaluatedSatellite, Observer};

const STATION_CAMERA_HEIGHT_M: f64 = 8_000_000.0;
const CONSTELLATION_CAMERA_HEIGHT_M: f64 = 25_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMode {
    /// One constellation, only satellites usable from the observer.
    Station,
    /// Every propagated satellite of one or more constellations.
    Constellation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverageRequest {
    pub constellations: Vec<Constellation>,
    pub observer: Observer,
    pub max_sats: usize,
    pub mode: CoverageMode,
    #[serde(default)]
    pub min_elevation_override: Option<f64>,
    #[serde(default)]
    pub heatmap: bool,
    #[serde(default)]
    pub point_spacing_km: Option<f64>,
}

/// Suggested viewpoint for a globe renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraFrame {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub height_m: f64,
}

impl CameraFrame {
    pub fn for_mode(mode: CoverageMode, observer: &Observer) -> Self {
        let height_m = match mode {
            CoverageMode::Station => STATION_CAMERA_HEIGHT_M,
            CoverageMode::Constellation => CONSTELLATION_CAMERA_HEIGHT_M,
        };
        Self {
            latitude_deg: observer.latitude_deg,
            longitude_deg: observer.longitude_deg,
            height_m,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageResponse {
    pub timestamp: DateTime<Utc>,
    pub observer: Observer,
    pub mode: CoverageMode,
    pub constellations: Vec<Constellation>,
    pub satellites: Vec<EvaluatedSatellite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap_points: Option<Vec<HeatmapPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraFrame>,
    /// Constellations served from an expired cache entry.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stale_constellations: Vec<Constellation>,
}
