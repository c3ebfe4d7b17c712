//! Assessment configuration read from environment variables.
//!
//! Every value has a default, so an empty environment yields the
//! reference behaviour: 50 mm flood saturation, magnitude 5.0 earthquake
//! threshold, 35 °C / 30 % wildfire thresholds, a 15-minute cache TTL, a
//! 100 km seismic search radius and a 15-minute sweep period.

use std::str::FromStr;
use std::time::Duration;

/// Hours of seismic history searched for each earthquake assessment.
pub const SEISMIC_LOOKBACK_HOURS: u32 = 24;

const DEFAULT_FLOOD_HIGH_MM: f64 = 50.0;
const DEFAULT_EARTHQUAKE_HIGH_MAGNITUDE: f64 = 5.0;
const DEFAULT_WILDFIRE_TEMPERATURE_C: f64 = 35.0;
const DEFAULT_WILDFIRE_HUMIDITY_PCT: f64 = 30.0;
const DEFAULT_CACHE_TTL_SECS: u64 = 900;
const DEFAULT_SEISMIC_RADIUS_KM: f64 = 100.0;
const DEFAULT_SWEEP_CONCURRENCY: usize = 1;
const DEFAULT_FETCH_INTERVAL_SECS: u64 = 900;

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    Invalid {
        /// Environment variable name.
        name: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// A value that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Environment variable name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Tunable constants of the scoring formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    /// Hourly rainfall (mm) at which the flood score saturates at 100.
    pub flood_high_mm: f64,
    /// Magnitude `T` at which an earthquake scores 100.
    pub earthquake_high_magnitude: f64,
    /// Temperature (°C) at which the wildfire temperature half saturates.
    pub wildfire_temperature_c: f64,
    /// Humidity (%) at or below which the wildfire humidity half
    /// saturates.
    pub wildfire_humidity_pct: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            flood_high_mm: DEFAULT_FLOOD_HIGH_MM,
            earthquake_high_magnitude: DEFAULT_EARTHQUAKE_HIGH_MAGNITUDE,
            wildfire_temperature_c: DEFAULT_WILDFIRE_TEMPERATURE_C,
            wildfire_humidity_pct: DEFAULT_WILDFIRE_HUMIDITY_PCT,
        }
    }
}

/// Settings for the [`RiskAssessor`](crate::RiskAssessor).
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentConfig {
    /// Scoring formula constants.
    pub thresholds: RiskThresholds,
    /// How long a fetched payload may be reused.
    pub cache_ttl: Duration,
    /// Search radius for seismic events, in kilometres.
    pub seismic_radius_km: f64,
    /// Number of pairs assessed concurrently during a sweep. `1` processes
    /// pairs strictly one after another.
    pub sweep_concurrency: usize,
    /// Period between scheduled sweeps.
    pub fetch_interval: Duration,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            thresholds: RiskThresholds::default(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            seismic_radius_km: DEFAULT_SEISMIC_RADIUS_KM,
            sweep_concurrency: DEFAULT_SWEEP_CONCURRENCY,
            fetch_interval: Duration::from_secs(DEFAULT_FETCH_INTERVAL_SECS),
        }
    }
}

impl AssessmentConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is malformed or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value. Unset and blank variables take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is malformed or out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let thresholds = RiskThresholds {
            flood_high_mm: positive(
                "FLOOD_HIGH_THRESHOLD",
                parse_var(&lookup, "FLOOD_HIGH_THRESHOLD", DEFAULT_FLOOD_HIGH_MM)?,
            )?,
            earthquake_high_magnitude: positive(
                "EARTHQUAKE_HIGH_THRESHOLD",
                parse_var(
                    &lookup,
                    "EARTHQUAKE_HIGH_THRESHOLD",
                    DEFAULT_EARTHQUAKE_HIGH_MAGNITUDE,
                )?,
            )?,
            wildfire_temperature_c: positive(
                "WILDFIRE_TEMP_THRESHOLD",
                parse_var(
                    &lookup,
                    "WILDFIRE_TEMP_THRESHOLD",
                    DEFAULT_WILDFIRE_TEMPERATURE_C,
                )?,
            )?,
            wildfire_humidity_pct: parse_var(
                &lookup,
                "WILDFIRE_HUMIDITY_THRESHOLD",
                DEFAULT_WILDFIRE_HUMIDITY_PCT,
            )?,
        };

        let cache_ttl_secs: u64 = parse_var(&lookup, "RISK_CACHE_TTL", DEFAULT_CACHE_TTL_SECS)?;
        let seismic_radius_km = positive(
            "SEISMIC_RADIUS_KM",
            parse_var(&lookup, "SEISMIC_RADIUS_KM", DEFAULT_SEISMIC_RADIUS_KM)?,
        )?;

        let sweep_concurrency: usize =
            parse_var(&lookup, "SWEEP_CONCURRENCY", DEFAULT_SWEEP_CONCURRENCY)?;
        if sweep_concurrency == 0 {
            return Err(ConfigError::NotPositive {
                name: "SWEEP_CONCURRENCY",
                value: 0.0,
            });
        }

        let fetch_interval_secs: u64 = parse_var(
            &lookup,
            "RISK_FETCH_INTERVAL_SECS",
            DEFAULT_FETCH_INTERVAL_SECS,
        )?;
        if fetch_interval_secs == 0 {
            return Err(ConfigError::NotPositive {
                name: "RISK_FETCH_INTERVAL_SECS",
                value: 0.0,
            });
        }

        Ok(Self {
            thresholds,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            seismic_radius_km,
            sweep_concurrency,
            fetch_interval: Duration::from_secs(fetch_interval_secs),
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value: raw })
        }
        _ => Ok(default),
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}
