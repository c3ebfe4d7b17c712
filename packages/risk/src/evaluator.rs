//! Pure scoring formulas, one per disaster type.
//!
//! Every formula returns a score in `[0, 100]`. The risk level is derived
//! from the score with [`RiskLevel::from_score`](disaster_watch_risk_models::RiskLevel::from_score).

use disaster_watch_risk_models::{
    DisasterType, MAX_RISK_SCORE, RiskData, SeismicSnapshot, WeatherSnapshot,
};

use crate::RiskError;
use crate::config::RiskThresholds;
use crate::report::RiskDetails;

/// Maximum points contributed by each half of the wildfire formula.
const WILDFIRE_HALF_SCORE: f64 = 50.0;

/// Humidity span (percentage points above the threshold) over which the
/// wildfire humidity contribution decays from 50 to 0.
const HUMIDITY_DECAY_RANGE: f64 = 70.0;

/// Score and supporting figures for one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Risk score in `[0, 100]`.
    pub score: f64,
    /// Raw figures that produced the score.
    pub details: RiskDetails,
}

/// Scores `data` with the formula for `disaster_type`.
///
/// # Errors
///
/// Returns [`RiskError::DataMismatch`] if `data` is not the payload shape
/// scored for `disaster_type` (weather for floods and wildfires, seismic
/// for earthquakes).
pub fn evaluate(
    disaster_type: DisasterType,
    data: &RiskData,
    thresholds: &RiskThresholds,
) -> Result<Evaluation, RiskError> {
    match (disaster_type, data) {
        (DisasterType::Flood, RiskData::Weather { weather }) => Ok(Evaluation {
            score: flood_score(weather.rainfall, thresholds.flood_high_mm),
            details: RiskDetails::flood(weather),
        }),
        (DisasterType::Wildfire, RiskData::Weather { weather }) => Ok(Evaluation {
            score: wildfire_score(weather, thresholds),
            details: RiskDetails::wildfire(weather),
        }),
        (DisasterType::Earthquake, RiskData::Seismic { event }) => Ok(Evaluation {
            score: earthquake_score(event.as_ref(), thresholds.earthquake_high_magnitude),
            details: RiskDetails::earthquake(event.as_ref()),
        }),
        (disaster_type, data) => Err(RiskError::DataMismatch {
            disaster_type,
            found: data.kind(),
        }),
    }
}

/// Flood risk: linear in rainfall, saturating at `high_threshold_mm`.
#[must_use]
pub fn flood_score(rainfall_mm: f64, high_threshold_mm: f64) -> f64 {
    clamp_score(rainfall_mm * MAX_RISK_SCORE / high_threshold_mm)
}

/// Wildfire risk: a temperature half plus a humidity half.
///
/// The humidity half falls linearly above the humidity threshold and is
/// not floored before the halves are summed, so humidity above 100 %
/// pulls the total below the temperature contribution alone.
#[must_use]
pub fn wildfire_score(weather: &WeatherSnapshot, thresholds: &RiskThresholds) -> f64 {
    let temperature_points = if weather.temperature >= thresholds.wildfire_temperature_c {
        WILDFIRE_HALF_SCORE
    } else {
        WILDFIRE_HALF_SCORE * weather.temperature / thresholds.wildfire_temperature_c
    };

    let humidity_points = if weather.humidity <= thresholds.wildfire_humidity_pct {
        WILDFIRE_HALF_SCORE
    } else {
        WILDFIRE_HALF_SCORE
            - WILDFIRE_HALF_SCORE * (weather.humidity - thresholds.wildfire_humidity_pct)
                / HUMIDITY_DECAY_RANGE
    };

    clamp_score(temperature_points + humidity_points)
}

/// Earthquake risk: a step function of magnitude relative to
/// `high_magnitude`. No event scores 0; any event scores at least 20.
#[must_use]
pub fn earthquake_score(event: Option<&SeismicSnapshot>, high_magnitude: f64) -> f64 {
    let Some(event) = event else {
        return 0.0;
    };

    if event.magnitude >= high_magnitude {
        100.0
    } else if event.magnitude >= high_magnitude - 1.0 {
        70.0
    } else if event.magnitude >= high_magnitude - 2.0 {
        40.0
    } else {
        20.0
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, MAX_RISK_SCORE)
}
