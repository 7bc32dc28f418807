use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::constellation::{ConfigurationError, Constellation, ConstellationConfig};
use crate::coverage::error::CoverageError;
use crate::coverage::types::{CameraFrame, CoverageMode, CoverageRequest, CoverageResponse};
use crate::elements::{AcquisitionError, ElementAcquirer, SatelliteRecord};
use crate::heatmap;
use crate::visibility::{evaluate, EvaluatedSatellite, Observer, Propagator};

pub struct CoverageService {
    acquirer: Arc<ElementAcquirer>,
    propagator: Arc<dyn Propagator>,
    max_concurrency: usize,
    default_point_spacing_km: f64,
}

impl CoverageService {
    pub fn new(
        acquirer: Arc<ElementAcquirer>,
        propagator: Arc<dyn Propagator>,
        max_concurrency: usize,
        default_point_spacing_km: f64,
    ) -> Self {
        Self {
            acquirer,
            propagator,
            max_concurrency: max_concurrency.max(1),
            default_point_spacing_km,
        }
    }

    pub async fn compute(
        &self,
        request: &CoverageRequest,
        at: DateTime<Utc>,
    ) -> Result<CoverageResponse, CoverageError> {
        let constellations = validate(request)?;
        let point_spacing_km = request
            .point_spacing_km
            .unwrap_or(self.default_point_spacing_km);
        if request.heatmap
            && !(point_spacing_km.is_finite() && point_spacing_km >= heatmap::MIN_POINT_SPACING_KM)
        {
            return Err(ConfigurationError::InvalidPointSpacing(point_spacing_km).into());
        }

        let mut satellites = Vec::new();
        let mut served = Vec::new();
        let mut stale = Vec::new();
        let mut last_error: Option<AcquisitionError> = None;

        for constellation in constellations {
            let config = constellation
                .config()
                .with_min_elevation(request.min_elevation_override)?;

            let acquisition = match self.acquirer.acquire(constellation, request.max_sats).await {
                Ok(a) => a,
                Err(e) => {
                    log::warn!("Skipping {}: {}", constellation, e);
                    last_error = Some(e);
                    continue;
                }
            };
            if acquisition.is_degraded() {
                stale.push(constellation);
            }
            served.push(constellation);

            let evaluated = self
                .evaluate_all(acquisition.records, request.observer, config, at)
                .await;
            log::info!(
                "{}: {} satellite(s) evaluated for {:?} mode",
                constellation,
                evaluated.len(),
                request.mode
            );
            satellites.extend(evaluated);
        }

        if served.is_empty() {
            if let Some(e) = last_error {
                return Err(e.into());
            }
        }

        if request.mode == CoverageMode::Station {
            satellites.retain(|s| s.available);
        }

        let heatmap_points = request
            .heatmap
            .then(|| heatmap::sample(&satellites, point_spacing_km));

        Ok(CoverageResponse {
            timestamp: at,
            observer: request.observer,
            mode: request.mode,
            constellations: served,
            satellites,
            heatmap_points,
            camera: Some(CameraFrame::for_mode(request.mode, &request.observer)),
            stale_constellations: stale,
        })
    }

    /// Evaluate every record on at most `max_concurrency` blocking tasks.
    /// Output order is unspecified.
    async fn evaluate_all(
        &self,
        records: Vec<SatelliteRecord>,
        observer: Observer,
        config: ConstellationConfig,
        at: DateTime<Utc>,
    ) -> Vec<EvaluatedSatellite> {
        if records.is_empty() {
            return Vec::new();
        }

        let chunk_size = records.len().div_ceil(self.max_concurrency);
        let mut tasks = JoinSet::new();
        for chunk in records.chunks(chunk_size) {
            let chunk = chunk.to_vec();
            let propagator = self.propagator.clone();
            tasks.spawn_blocking(move || {
                chunk
                    .iter()
                    .filter_map(|record| {
                        evaluate(record, &observer, &config, at, propagator.as_ref())
                    })
                    .collect::<Vec<_>>()
            });
        }

        let mut evaluated = Vec::with_capacity(records.len());
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(batch) => evaluated.extend(batch),
                Err(e) => log::error!("Evaluation task failed: {}", e),
            }
        }
        evaluated
    }
}

/// Reject malformed requests before any network activity. Returns the
/// requested constellations without repeats, in request order.
fn validate(request: &CoverageRequest) -> Result<Vec<Constellation>, ConfigurationError> {
    let mut constellations: Vec<Constellation> = Vec::new();
    for c in &request.constellations {
        if !constellations.contains(c) {
            constellations.push(*c);
        }
    }

    if constellations.is_empty() {
        return Err(ConfigurationError::NoConstellation);
    }
    if request.mode == CoverageMode::Station && constellations.len() != 1 {
        return Err(ConfigurationError::StationModeArity(constellations.len()));
    }
    Ok(constellations)
}
