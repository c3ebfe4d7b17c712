//! Assessment output types.
//!
//! A [`DisasterRiskReport`] is immutable once built: its risk level and
//! alert flag are derived from the score in [`DisasterRiskReport::new`]
//! and cannot be set independently.

use chrono::{DateTime, Utc};
use disaster_watch_risk_models::{
    DisasterType, Region, RegionId, RiskLevel, SeismicSnapshot, WeatherSnapshot,
};
use serde::Serialize;

use crate::threshold::alert_triggered;

/// Detail text reported when no earthquake was found in the lookback
/// window.
pub const NO_SEISMIC_ACTIVITY_MESSAGE: &str = "No recent earthquake activity";

/// Raw figures behind a score, for human-readable alert text.
///
/// Serializes as a flat map whose keys depend on the disaster type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RiskDetails {
    /// Flood inputs.
    Flood {
        /// Rainfall over the trailing hour (mm).
        rainfall: f64,
        /// Relative humidity (%).
        humidity: f64,
        /// Weather description.
        description: String,
    },
    /// Wildfire inputs.
    Wildfire {
        /// Temperature (°C).
        temperature: f64,
        /// Relative humidity (%).
        humidity: f64,
        /// Weather description.
        description: String,
    },
    /// The strongest recent earthquake.
    Earthquake {
        /// Event magnitude.
        magnitude: f64,
        /// Depth (km).
        depth: f64,
        /// Place description.
        place: String,
        /// Event time.
        time: DateTime<Utc>,
    },
    /// No earthquake in the lookback window.
    NoSeismicActivity {
        /// Always [`NO_SEISMIC_ACTIVITY_MESSAGE`].
        message: &'static str,
    },
}

impl RiskDetails {
    /// Flood details from a weather reading.
    #[must_use]
    pub fn flood(weather: &WeatherSnapshot) -> Self {
        Self::Flood {
            rainfall: weather.rainfall,
            humidity: weather.humidity,
            description: weather.description.clone(),
        }
    }

    /// Wildfire details from a weather reading.
    #[must_use]
    pub fn wildfire(weather: &WeatherSnapshot) -> Self {
        Self::Wildfire {
            temperature: weather.temperature,
            humidity: weather.humidity,
            description: weather.description.clone(),
        }
    }

    /// Earthquake details, or the "no recent activity" sentinel.
    #[must_use]
    pub fn earthquake(event: Option<&SeismicSnapshot>) -> Self {
        event.map_or(
            Self::NoSeismicActivity {
                message: NO_SEISMIC_ACTIVITY_MESSAGE,
            },
            |event| Self::Earthquake {
                magnitude: event.magnitude,
                depth: event.depth,
                place: event.place.clone(),
                time: event.time,
            },
        )
    }

    /// Returns the details as ordered `(key, value)` text pairs.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Flood {
                rainfall,
                humidity,
                description,
            } => vec![
                ("rainfall", rainfall.to_string()),
                ("humidity", humidity.to_string()),
                ("description", description.clone()),
            ],
            Self::Wildfire {
                temperature,
                humidity,
                description,
            } => vec![
                ("temperature", temperature.to_string()),
                ("humidity", humidity.to_string()),
                ("description", description.clone()),
            ],
            Self::Earthquake {
                magnitude,
                depth,
                place,
                time,
            } => vec![
                ("magnitude", magnitude.to_string()),
                ("depth", depth.to_string()),
                ("place", place.clone()),
                ("time", time.to_rfc3339()),
            ],
            Self::NoSeismicActivity { message } => vec![("message", (*message).to_string())],
        }
    }
}

/// Risk assessment result for one (region, disaster type) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterRiskReport {
    region_id: RegionId,
    region_name: String,
    disaster_type: DisasterType,
    risk_score: f64,
    risk_level: RiskLevel,
    alert_triggered: bool,
    details: RiskDetails,
}

impl DisasterRiskReport {
    /// Builds a report, deriving the risk level from `risk_score` and the
    /// alert flag from `risk_score` and `threshold`.
    #[must_use]
    pub fn new(
        region: &Region,
        disaster_type: DisasterType,
        risk_score: f64,
        threshold: Option<f64>,
        details: RiskDetails,
    ) -> Self {
        Self {
            region_id: region.id,
            region_name: region.name.clone(),
            disaster_type,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            alert_triggered: alert_triggered(threshold, risk_score),
            details,
        }
    }

    #[must_use]
    pub const fn region_id(&self) -> RegionId {
        self.region_id
    }

    #[must_use]
    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    #[must_use]
    pub const fn disaster_type(&self) -> DisasterType {
        self.disaster_type
    }

    #[must_use]
    pub const fn risk_score(&self) -> f64 {
        self.risk_score
    }

    #[must_use]
    pub const fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    #[must_use]
    pub const fn alert_triggered(&self) -> bool {
        self.alert_triggered
    }

    #[must_use]
    pub const fn details(&self) -> &RiskDetails {
        &self.details
    }
}

/// A pair that could not be assessed during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedAssessment {
    /// Region of the failed pair.
    pub region_id: RegionId,
    /// Disaster type of the failed pair.
    pub disaster_type: DisasterType,
    /// Rendered error.
    pub error: String,
}

/// Outcome of one sweep across every monitored region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Successfully produced reports, in region then disaster-type order.
    pub reports: Vec<DisasterRiskReport>,
    /// When the sweep finished.
    pub timestamp: DateTime<Utc>,
    /// Pairs that failed and were left out of `reports`.
    pub skipped: Vec<SkippedAssessment>,
}

impl SweepReport {
    /// Number of pairs left out because their assessment failed.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Reports whose alert condition is met.
    pub fn triggered(&self) -> impl Iterator<Item = &DisasterRiskReport> {
        self.reports.iter().filter(|report| report.alert_triggered())
    }
}
