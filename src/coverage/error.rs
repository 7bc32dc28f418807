use thiserror::Error;

use crate::constellation::ConfigurationError;
use crate::elements::AcquisitionError;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("no element sets available: {0}")]
    Acquisition(#[from] AcquisitionError),
}
