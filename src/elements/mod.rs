mod acquirer;
mod cache;
mod error;
mod parsing;
mod source;
mod types;

pub use acquirer::{ElementAcquirer, Freshness};
pub use cache::ElementCache;
pub use error::AcquisitionError;
#[cfg(test)]
pub use error::FetchError;
pub use source::CelestrakSource;
#[cfg(test)]
pub use source::ElementSource;
pub use types::SatelliteRecord;
