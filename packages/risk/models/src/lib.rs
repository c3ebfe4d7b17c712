#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Region, disaster type, and environmental snapshot types.
//!
//! These are the plain data types shared by every disaster-watch crate.
//! Regions and alert settings are owned by whatever persistence layer
//! backs the registry; the assessment engine only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Identifier of a monitored region.
pub type RegionId = u64;

/// Score at or above which a risk is classified [`RiskLevel::High`].
pub const HIGH_RISK_SCORE: f64 = 70.0;

/// Score at or above which a risk is classified [`RiskLevel::Medium`].
pub const MEDIUM_RISK_SCORE: f64 = 40.0;

/// Upper bound of every risk score and alert threshold.
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Kind of natural disaster a region can be monitored for.
///
/// Determines both the raw data shape fetched for a region and the
/// scoring formula applied to it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DisasterType {
    /// Flooding driven by recent rainfall.
    Flood,
    /// Earthquakes near the region.
    Earthquake,
    /// Wildfire driven by heat and dry air.
    Wildfire,
}

impl DisasterType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Flood, Self::Earthquake, Self::Wildfire]
    }
}

/// Three-level risk classification derived from a score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RiskLevel {
    /// Score below 40.
    Low,
    /// Score in `[40, 70)`.
    Medium,
    /// Score of 70 or more.
    High,
}

impl RiskLevel {
    /// Classifies a risk score. Each tier includes its lower bound.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_SCORE {
            Self::High
        } else if score >= MEDIUM_RISK_SCORE {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Errors raised when constructing domain values from untrusted input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    /// A region must monitor at least one disaster type.
    #[error("region must monitor at least one disaster type")]
    NoDisasterTypes,

    /// Alert threshold outside `[0, 100]`.
    #[error("threshold score {0} is outside [0, 100]")]
    Threshold(f64),
}

/// A monitored geographic region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Unique region identifier.
    pub id: RegionId,
    /// Human-readable name used in alert text.
    pub name: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Disaster types monitored for this region, in configured order.
    pub disaster_types: Vec<DisasterType>,
}

impl Region {
    /// Creates a validated region.
    ///
    /// Repeated disaster types are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a coordinate is out of range or no
    /// disaster type is given.
    pub fn new(
        id: RegionId,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        disaster_types: impl IntoIterator<Item = DisasterType>,
    ) -> Result<Self, ValidationError> {
        let mut types: Vec<DisasterType> = Vec::new();
        for disaster_type in disaster_types {
            if !types.contains(&disaster_type) {
                types.push(disaster_type);
            }
        }

        let region = Self {
            id,
            name: name.into(),
            latitude,
            longitude,
            disaster_types: types,
        };
        region.validate()?;
        Ok(region)
    }

    /// Checks coordinate ranges and that at least one type is monitored.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::Latitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::Longitude(self.longitude));
        }
        if self.disaster_types.is_empty() {
            return Err(ValidationError::NoDisasterTypes);
        }
        Ok(())
    }

    /// Returns `true` if this region monitors `disaster_type`.
    #[must_use]
    pub fn monitors(&self, disaster_type: DisasterType) -> bool {
        self.disaster_types.contains(&disaster_type)
    }
}

/// Current weather conditions at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Rainfall over the trailing hour in millimetres.
    pub rainfall: f64,
    /// Free-text conditions summary (e.g. `"light rain"`).
    pub description: String,
}

/// The strongest recent earthquake near a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicSnapshot {
    /// Event magnitude.
    pub magnitude: f64,
    /// Hypocentre depth in kilometres.
    pub depth: f64,
    /// Place description reported by the feed.
    pub place: String,
    /// When the event occurred.
    pub time: DateTime<Utc>,
}

/// Raw environmental payload used to score one (region, disaster type)
/// pair. This is what the risk cache stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RiskData {
    /// Weather conditions, used for floods and wildfires.
    Weather {
        /// The fetched conditions.
        weather: WeatherSnapshot,
    },
    /// Seismic activity, used for earthquakes. `None` means no event in
    /// the lookback window, which is a valid reading.
    Seismic {
        /// The strongest event found, if any.
        event: Option<SeismicSnapshot>,
    },
}

impl RiskData {
    /// Returns `true` if this payload is the shape scored for
    /// `disaster_type`.
    #[must_use]
    pub const fn is_for(&self, disaster_type: DisasterType) -> bool {
        matches!(
            (self, disaster_type),
            (Self::Weather { .. }, DisasterType::Flood | DisasterType::Wildfire)
                | (Self::Seismic { .. }, DisasterType::Earthquake)
        )
    }

    /// Short name of the payload variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Weather { .. } => "weather",
            Self::Seismic { .. } => "seismic",
        }
    }
}

/// A per-region, per-disaster-type alert threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSetting {
    /// Region the threshold applies to.
    pub region_id: RegionId,
    /// Disaster type the threshold applies to.
    pub disaster_type: DisasterType,
    /// Score at or above which an alert is triggered.
    pub threshold_score: f64,
}

impl AlertSetting {
    /// Creates an alert setting with a validated threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Threshold`] if `threshold_score` is not
    /// within `[0, 100]`.
    pub fn new(
        region_id: RegionId,
        disaster_type: DisasterType,
        threshold_score: f64,
    ) -> Result<Self, ValidationError> {
        if !(0.0..=MAX_RISK_SCORE).contains(&threshold_score) {
            return Err(ValidationError::Threshold(threshold_score));
        }
        Ok(Self {
            region_id,
            disaster_type,
            threshold_score,
        })
    }
}
