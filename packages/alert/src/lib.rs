#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Alert composition and delivery for disaster risk reports.
//!
//! Reports whose alert condition is met are rendered into a plain-text
//! message ([`message`]) and handed to a [`Messenger`] for every
//! [`AlertRoute`] that matches the report's region and disaster type
//! ([`dispatcher`]). Delivered alerts are kept in an [`AlertLog`]
//! ([`history`]).

pub mod dispatcher;
pub mod history;
pub mod message;
pub mod messenger;

use disaster_watch_risk_models::{DisasterType, RegionId};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use dispatcher::{AlertDispatcher, DispatchSummary};
pub use history::{AlertLog, AlertRecord, DEFAULT_HISTORY_LIMIT};
pub use message::{ALERT_SUBJECT, compose_alert_message};
pub use messenger::{DeliveryError, Messenger, SimulatedMessenger};

/// How an alert reaches its recipient.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlertChannel {
    /// Text message to a phone number.
    Sms,
    /// E-mail to an address.
    Email,
}

/// Where alerts for a region are delivered.
///
/// A route without a disaster type receives alerts for every type the
/// region monitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRoute {
    /// Region whose alerts this route receives.
    pub region_id: RegionId,
    /// Restricts the route to one disaster type.
    #[serde(default)]
    pub disaster_type: Option<DisasterType>,
    /// Delivery channel.
    pub channel: AlertChannel,
    /// Phone number or e-mail address.
    pub recipient: String,
}

impl AlertRoute {
    /// Returns `true` if this route receives alerts for the pair.
    #[must_use]
    pub fn matches(&self, region_id: RegionId, disaster_type: DisasterType) -> bool {
        self.region_id == region_id
            && self
                .disaster_type
                .is_none_or(|route_type| route_type == disaster_type)
    }
}

#[derive(Debug, Deserialize)]
struct RoutesFile {
    #[serde(default)]
    routes: Vec<AlertRoute>,
}

/// Reads the `[[routes]]` tables of a configuration document. Other tables
/// are ignored.
///
/// # Errors
///
/// Returns [`toml::de::Error`] if the document is not valid TOML or a
/// route is malformed.
pub fn routes_from_toml_str(document: &str) -> Result<Vec<AlertRoute>, toml::de::Error> {
    let file: RoutesFile = toml::from_str(document)?;
    Ok(file.routes)
}
