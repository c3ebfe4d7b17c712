//! Environmental data provider seams.
//!
//! The HTTP implementations live in `disaster_watch_providers`; the
//! assessor only sees these traits.

use async_trait::async_trait;
use disaster_watch_risk_models::{SeismicSnapshot, WeatherSnapshot};

/// Errors from an environmental data provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be sent or the response not read.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("Unexpected HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response did not have the expected shape.
    #[error("Malformed response: {message}")]
    Malformed {
        /// Description of what was missing or invalid.
        message: String,
    },

    /// The provider rejected the request for exceeding its rate limit.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetches current conditions at a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on network or parse failure.
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, ProviderError>;
}

/// Source of recent seismic events.
#[async_trait]
pub trait SeismicProvider: Send + Sync {
    /// Returns the strongest event within `radius_km` of a coordinate in
    /// the last `lookback_hours`, or `None` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on network or parse failure.
    async fn fetch_seismic_activity(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        lookback_hours: u32,
    ) -> Result<Option<SeismicSnapshot>, ProviderError>;
}

/// Keeps only the highest-magnitude event. Ties keep the earliest
/// candidate.
pub fn strongest_event(
    events: impl IntoIterator<Item = SeismicSnapshot>,
) -> Option<SeismicSnapshot> {
    events.into_iter().fold(None, |strongest, event| match strongest {
        Some(current) if current.magnitude >= event.magnitude => Some(current),
        _ => Some(event),
    })
}
