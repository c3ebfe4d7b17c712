#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Disaster risk assessment engine.
//!
//! Turns raw environmental readings into a 0-100 risk score per
//! (region, disaster type) pair, classifies the score, and decides whether
//! the region's alert threshold has been met:
//!
//! 1. **Cache** ([`cache`]): cache-aside lookup of the raw payload, keyed
//!    by region and disaster type, with a fixed TTL.
//! 2. **Providers** ([`providers`]): weather and seismic data sources,
//!    consulted on a cache miss.
//! 3. **Evaluator** ([`evaluator`]): one pure scoring formula per
//!    disaster type.
//! 4. **Threshold check** ([`threshold`]): compares the score against the
//!    configured alert threshold.
//!
//! [`assessor::RiskAssessor`] wires these together for a single pair and
//! for a full sweep across every monitored region. All collaborators are
//! injected as trait objects so tests can substitute fakes.

pub mod assessor;
pub mod cache;
pub mod config;
pub mod evaluator;
pub mod providers;
pub mod report;
pub mod repository;
pub mod threshold;

use disaster_watch_risk_models::{DisasterType, RegionId};

pub use assessor::{Collaborators, RiskAssessor};
pub use cache::{CacheError, CacheKey, MemoryRiskCache, RiskCache};
pub use config::{AssessmentConfig, ConfigError, RiskThresholds};
pub use providers::{ProviderError, SeismicProvider, WeatherProvider};
pub use report::{DisasterRiskReport, RiskDetails, SkippedAssessment, SweepReport};
pub use repository::{AlertSettingRepository, RegionRepository, RepositoryError};

/// Errors that can occur while assessing a single (region, disaster type)
/// pair.
///
/// Cache failures never appear here: they degrade to a cache miss or a
/// skipped write inside the assessor.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// The requested region does not exist.
    #[error("Region with ID {region_id} not found")]
    NotFound {
        /// The region that was looked up.
        region_id: RegionId,
    },

    /// An environmental data provider failed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Region or alert-setting lookup failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A scoring formula was handed the wrong kind of payload.
    #[error("Cannot score {disaster_type} risk from {found} data")]
    DataMismatch {
        /// The disaster type being scored.
        disaster_type: DisasterType,
        /// The payload variant that was supplied.
        found: &'static str,
    },
}
