use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown constellation: {0}")]
    UnknownConstellation(String),
    #[error("minimum elevation override out of range: {0}")]
    InvalidMinElevation(f64),
    #[error("no constellation requested")]
    NoConstellation,
    #[error("station mode takes exactly one constellation, got {0}")]
    StationModeArity(usize),
    #[error("invalid point spacing: {0}")]
    InvalidPointSpacing(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Constellation {
    Iridium,
    Starlink,
    Kuiper,
}

/// Downlink and visibility thresholds for one constellation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConstellationConfig {
    pub frequency_ghz: f64,
    pub min_elevation_deg: f64,
    pub max_path_loss_db: f64,
}

const IRIDIUM: ConstellationConfig = ConstellationConfig {
    frequency_ghz: 1.6,
    min_elevation_deg: 10.0,
    max_path_loss_db: 160.0,
};

const KU_BAND_BROADBAND: ConstellationConfig = ConstellationConfig {
    frequency_ghz: 12.0,
    min_elevation_deg: 25.0,
    max_path_loss_db: 155.0,
};

impl Constellation {
    pub const ALL: [Constellation; 3] = [
        Constellation::Iridium,
        Constellation::Starlink,
        Constellation::Kuiper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Constellation::Iridium => "iridium",
            Constellation::Starlink => "starlink",
            Constellation::Kuiper => "kuiper",
        }
    }

    /// CelesTrak GROUP name carrying this constellation's element sets.
    pub fn group(&self) -> &'static str {
        match self {
            Constellation::Iridium => "iridium-NEXT",
            Constellation::Starlink => "starlink",
            Constellation::Kuiper => "kuiper",
        }
    }

    pub fn config(&self) -> ConstellationConfig {
        match self {
            Constellation::Iridium => IRIDIUM,
            Constellation::Starlink | Constellation::Kuiper => KU_BAND_BROADBAND,
        }
    }
}

impl fmt::Display for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Constellation {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Constellation::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| ConfigurationError::UnknownConstellation(s.to_string()))
    }
}

impl ConstellationConfig {
    pub fn with_min_elevation(self, override_deg: Option<f64>) -> Result<Self, ConfigurationError> {
        match override_deg {
            None => Ok(self),
            Some(deg) if (0.0..=90.0).contains(&deg) => Ok(Self {
                min_elevation_deg: deg,
                ..self
            }),
            Some(deg) => Err(ConfigurationError::InvalidMinElevation(deg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_identifiers() {
        assert_eq!("iridium".parse::<Constellation>(), Ok(Constellation::Iridium));
        assert_eq!(" Starlink ".parse::<Constellation>(), Ok(Constellation::Starlink));
        assert_eq!("kuiper".parse::<Constellation>(), Ok(Constellation::Kuiper));
    }

    #[test]
    fn unknown_identifier_fails_fast() {
        assert_eq!(
            "oneweb".parse::<Constellation>(),
            Err(ConfigurationError::UnknownConstellation("oneweb".into()))
        );
    }

    #[test]
    fn iridium_link_budget() {
        let config = Constellation::Iridium.config();
        assert_eq!(config.frequency_ghz, 1.6);
        assert_eq!(config.min_elevation_deg, 10.0);
        assert_eq!(config.max_path_loss_db, 160.0);
    }

    #[test]
    fn min_elevation_override() {
        let config = Constellation::Starlink.config();
        assert_eq!(config.with_min_elevation(None), Ok(config));
        assert_eq!(
            config.with_min_elevation(Some(40.0)).map(|c| c.min_elevation_deg),
            Ok(40.0)
        );
        assert_eq!(
            config.with_min_elevation(Some(95.0)),
            Err(ConfigurationError::InvalidMinElevation(95.0))
        );
    }
}
