//! `OpenWeather` current-weather client.
//!
//! Requests metric units and reads temperature, humidity, the trailing
//! hour's rainfall and the first condition description.
//!
//! See <https://openweathermap.org/current>

use async_trait::async_trait;
use disaster_watch_risk::{ProviderError, WeatherProvider};
use disaster_watch_risk_models::WeatherSnapshot;

use crate::{FetchError, retry};

/// [`WeatherProvider`] backed by the `OpenWeather` API.
pub struct OpenWeatherProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherProvider {
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot, FetchError> {
        log::debug!("Fetching weather data for ({latitude}, {longitude})");

        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let body = retry::send_json(|| {
            self.client.get(&url).query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
        })
        .await?;

        parse_response(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, ProviderError> {
        self.fetch(latitude, longitude).await.map_err(|e| {
            log::error!("Failed to fetch weather data for ({latitude}, {longitude}): {e}");
            e.into()
        })
    }
}

/// Parses a current-weather JSON response.
///
/// A missing `rain.1h` means no rain fell (0 mm); a missing description
/// becomes an empty string.
fn parse_response(body: &serde_json::Value) -> Result<WeatherSnapshot, FetchError> {
    let temperature = body["main"]["temp"]
        .as_f64()
        .ok_or_else(|| FetchError::Parse {
            message: "Missing main.temp in OpenWeather response".to_string(),
        })?;

    let humidity = body["main"]["humidity"]
        .as_f64()
        .ok_or_else(|| FetchError::Parse {
            message: "Missing main.humidity in OpenWeather response".to_string(),
        })?;

    let rainfall = body["rain"]["1h"].as_f64().unwrap_or(0.0);

    let description = body["weather"][0]["description"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    Ok(WeatherSnapshot {
        temperature,
        humidity,
        rainfall,
        description,
    })
}
