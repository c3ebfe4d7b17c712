#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! HTTP environmental data providers.
//!
//! - [`openweather::OpenWeatherProvider`]: current conditions from the
//!   `OpenWeather` "current weather" endpoint, used for flood and wildfire
//!   scoring.
//! - [`usgs::UsgsProvider`]: recent earthquakes from the USGS FDSN event
//!   service, used for earthquake scoring.
//!
//! Both share one [`reqwest::Client`] with a 10-second timeout and send
//! every request through [`retry`].

pub mod openweather;
pub mod retry;
pub mod usgs;

use std::time::Duration;

use disaster_watch_risk::ProviderError;

/// Default `OpenWeather` API root.
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Default USGS FDSN event query endpoint.
pub const DEFAULT_USGS_API_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Per-request network timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from HTTP fetches, before they are mapped to [`ProviderError`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-retryable status.
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded after all retries.
    #[error("Rate limit exceeded")]
    RateLimited,
}

impl From<FetchError> for ProviderError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Http(e) => Self::Transport {
                message: e.to_string(),
            },
            FetchError::Status(status) => Self::Status {
                status: status.as_u16(),
            },
            FetchError::Parse { message } => Self::Malformed { message },
            FetchError::RateLimited => Self::RateLimited,
        }
    }
}

/// Endpoint and credential settings for the HTTP providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// `OpenWeather` app id.
    pub openweather_api_key: String,
    /// `OpenWeather` API root.
    pub openweather_base_url: String,
    /// USGS event query endpoint.
    pub usgs_api_url: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openweather_api_key: String::new(),
            openweather_base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            usgs_api_url: DEFAULT_USGS_API_URL.to_string(),
        }
    }
}

impl ProviderSettings {
    /// Reads `OPENWEATHER_API_KEY`, `OPENWEATHER_BASE_URL` and
    /// `USGS_API_URL` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the settings through `lookup`. Unset or blank values take
    /// their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            openweather_api_key: read("OPENWEATHER_API_KEY", ""),
            openweather_base_url: read("OPENWEATHER_BASE_URL", DEFAULT_OPENWEATHER_BASE_URL),
            usgs_api_url: read("USGS_API_URL", DEFAULT_USGS_API_URL),
        }
    }
}

/// The HTTP-backed weather and seismic providers.
pub struct HttpProviders {
    /// Weather provider.
    pub weather: openweather::OpenWeatherProvider,
    /// Seismic provider.
    pub seismic: usgs::UsgsProvider,
}

impl HttpProviders {
    /// Builds both providers over one shared client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the HTTP client cannot be constructed.
    pub fn new(settings: ProviderSettings) -> Result<Self, FetchError> {
        if settings.openweather_api_key.is_empty() {
            log::warn!("OPENWEATHER_API_KEY is not set; weather requests will be rejected");
        }

        let client = build_client()?;

        Ok(Self {
            weather: openweather::OpenWeatherProvider::new(
                client.clone(),
                settings.openweather_base_url,
                settings.openweather_api_key,
            ),
            seismic: usgs::UsgsProvider::new(client, settings.usgs_api_url),
        })
    }
}

/// Builds the shared HTTP client.
///
/// # Errors
///
/// Returns [`FetchError::Http`] if the TLS backend fails to initialise.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("disaster-watch/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_public_endpoints() {
        let settings = ProviderSettings::from_lookup(|_| None);
        assert_eq!(settings, ProviderSettings::default());
        assert_eq!(settings.usgs_api_url, DEFAULT_USGS_API_URL);
    }

    #[test]
    fn settings_read_overrides() {
        let settings = ProviderSettings::from_lookup(|name| match name {
            "OPENWEATHER_API_KEY" => Some("abc123".to_string()),
            "USGS_API_URL" => Some("http://localhost:9000/query".to_string()),
            _ => None,
        });
        assert_eq!(settings.openweather_api_key, "abc123");
        assert_eq!(settings.openweather_base_url, DEFAULT_OPENWEATHER_BASE_URL);
        assert_eq!(settings.usgs_api_url, "http://localhost:9000/query");
    }

    #[test]
    fn fetch_errors_map_to_provider_errors() {
        assert_eq!(
            ProviderError::from(FetchError::Status(reqwest::StatusCode::UNAUTHORIZED)),
            ProviderError::Status { status: 401 }
        );
        assert_eq!(
            ProviderError::from(FetchError::Parse {
                message: "missing main.temp".to_string(),
            }),
            ProviderError::Malformed {
                message: "missing main.temp".to_string(),
            }
        );
        assert_eq!(
            ProviderError::from(FetchError::RateLimited),
            ProviderError::RateLimited
        );
    }
}
