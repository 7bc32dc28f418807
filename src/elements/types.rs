use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constellation::Constellation;

/// Raw element-set text for one constellation, as last fetched upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSet {
    pub constellation: Constellation,
    pub raw_text: String,
    pub fetched_at: DateTime<Utc>,
}

/// One satellite's two-line element set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SatelliteRecord {
    pub norad_id: u32,
    pub name: String,
    pub line1: String,
    pub line2: String,
}
