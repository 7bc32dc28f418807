use thiserror::Error;

use crate::constellation::Constellation;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("fetch timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("no valid element sets in upstream response")]
    Empty,
}

#[derive(Debug, Error)]
#[error("acquisition failed for {constellation}: {cause}")]
pub struct AcquisitionError {
    pub constellation: Constellation,
    #[source]
    pub cause: FetchError,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
