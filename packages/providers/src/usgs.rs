//! USGS earthquake catalog client.
//!
//! Queries the FDSN event service for events within a radius of a
//! coordinate over a trailing window, ordered by magnitude, and keeps the
//! strongest.
//!
//! See <https://earthquake.usgs.gov/fdsnws/event/1/>

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use disaster_watch_risk::providers::strongest_event;
use disaster_watch_risk::{ProviderError, SeismicProvider};
use disaster_watch_risk_models::SeismicSnapshot;

use crate::{FetchError, retry};

/// Timestamp format accepted by the `starttime` / `endtime` parameters.
const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// [`SeismicProvider`] backed by the USGS FDSN event API.
pub struct UsgsProvider {
    client: reqwest::Client,
    api_url: String,
}

impl UsgsProvider {
    #[must_use]
    pub const fn new(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        lookback_hours: u32,
    ) -> Result<Option<SeismicSnapshot>, FetchError> {
        log::debug!(
            "Fetching earthquake data for ({latitude}, {longitude}) within {radius_km} km"
        );

        let end = Utc::now();
        let start = end - TimeDelta::hours(i64::from(lookback_hours));
        let params = [
            ("format", "geojson".to_string()),
            ("starttime", start.format(QUERY_TIME_FORMAT).to_string()),
            ("endtime", end.format(QUERY_TIME_FORMAT).to_string()),
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("maxradiuskm", radius_km.to_string()),
            ("orderby", "magnitude".to_string()),
        ];

        let body = retry::send_json(|| self.client.get(&self.api_url).query(&params)).await?;
        let strongest = parse_response(&body)?;

        if strongest.is_none() {
            log::debug!("No recent earthquakes near ({latitude}, {longitude})");
        }

        Ok(strongest)
    }
}

#[async_trait]
impl SeismicProvider for UsgsProvider {
    async fn fetch_seismic_activity(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        lookback_hours: u32,
    ) -> Result<Option<SeismicSnapshot>, ProviderError> {
        self.fetch(latitude, longitude, radius_km, lookback_hours)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch earthquake data for ({latitude}, {longitude}): {e}");
                e.into()
            })
    }
}

/// Parses a `GeoJSON` feature collection and returns its strongest event.
///
/// Features without a magnitude, depth or valid time are skipped.
fn parse_response(body: &serde_json::Value) -> Result<Option<SeismicSnapshot>, FetchError> {
    let features = body["features"]
        .as_array()
        .ok_or_else(|| FetchError::Parse {
            message: "USGS response has no features array".to_string(),
        })?;

    Ok(strongest_event(features.iter().filter_map(parse_feature)))
}

fn parse_feature(feature: &serde_json::Value) -> Option<SeismicSnapshot> {
    let properties = &feature["properties"];

    let Some(magnitude) = properties["mag"].as_f64() else {
        log::debug!("Skipping USGS feature without magnitude: {}", feature["id"]);
        return None;
    };

    let Some(depth) = feature["geometry"]["coordinates"][2].as_f64() else {
        log::debug!("Skipping USGS feature without depth: {}", feature["id"]);
        return None;
    };

    let Some(time) = properties["time"]
        .as_i64()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
    else {
        log::debug!("Skipping USGS feature with missing or invalid time: {}", feature["id"]);
        return None;
    };

    let place = properties["place"].as_str().unwrap_or_default().to_string();

    Some(SeismicSnapshot {
        magnitude,
        depth,
        place,
        time,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn feature(mag: serde_json::Value, place: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "id": "us7000abcd",
            "properties": { "mag": mag, "place": place, "time": 1_761_624_000_000_i64 },
            "geometry": { "type": "Point", "coordinates": [121.6, 24.1, 18.4] }
        })
    }

    #[test]
    fn keeps_strongest_feature() {
        let body = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                feature(serde_json::json!(3.1), "near Yilan"),
                feature(serde_json::json!(4.6), "near Hualien"),
                feature(serde_json::json!(2.4), "near Taitung"),
            ]
        });

        let event = parse_response(&body).unwrap().unwrap();
        assert!((event.magnitude - 4.6).abs() < 1e-9);
        assert!((event.depth - 18.4).abs() < 1e-9);
        assert_eq!(event.place, "near Hualien");
        assert_eq!(
            event.time,
            Utc.with_ymd_and_hms(2025, 10, 28, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn empty_collection_is_no_activity() {
        let body = serde_json::json!({ "type": "FeatureCollection", "features": [] });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn features_without_magnitude_are_skipped() {
        let body = serde_json::json!({
            "features": [feature(serde_json::Value::Null, "unknown")]
        });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn malformed_features_are_skipped_not_fatal() {
        let mut no_depth = feature(serde_json::json!(5.8), "near Suao");
        no_depth["geometry"]["coordinates"] = serde_json::json!([121.8, 24.6]);
        let mut no_time = feature(serde_json::json!(6.1), "off the east coast");
        no_time["properties"]["time"] = serde_json::json!("yesterday");

        let body = serde_json::json!({
            "features": [no_depth, feature(serde_json::json!(3.9), "near Hualien"), no_time]
        });

        let event = parse_response(&body).unwrap().unwrap();
        assert!((event.magnitude - 3.9).abs() < 1e-9);
        assert_eq!(event.place, "near Hualien");
    }

    #[test]
    fn only_malformed_features_is_no_activity() {
        let mut no_depth = feature(serde_json::json!(4.4), "near Yilan");
        no_depth["geometry"] = serde_json::Value::Null;
        let body = serde_json::json!({ "features": [no_depth] });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn missing_features_is_malformed() {
        let body = serde_json::json!({ "error": "bad request" });
        assert!(matches!(
            parse_response(&body),
            Err(FetchError::Parse { .. })
        ));
    }
}
