mod evaluator;
mod geometry;
mod link_budget;
mod observer;
mod propagator;
#[cfg(test)]
pub(crate) mod testing;
mod track;
mod types;

pub use evaluator::evaluate;
pub use link_budget::EARTH_MEAN_RADIUS_KM;
pub use observer::Observer;
pub use propagator::{Propagator, Sgp4Propagator};
pub use track::orbit_track;
pub use types::EvaluatedSatellite;
