mod sampler;

pub use sampler::{sample, HeatmapPoint, MIN_POINT_SPACING_KM};
