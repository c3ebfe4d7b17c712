#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory registry of monitored regions and their alert thresholds.
//!
//! Regions and alert settings are loaded from a TOML document with
//! `[[regions]]` and `[[alert_settings]]` tables (other tables, such as
//! notification routes, are ignored here). A sample document is embedded
//! at compile time as [`SAMPLE_CONFIG`].
//!
//! [`RegionRegistry`] implements the [`RegionRepository`] and
//! [`AlertSettingRepository`] seams the risk assessor reads through.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use disaster_watch_risk::{AlertSettingRepository, RegionRepository, RepositoryError};
use disaster_watch_risk_models::{AlertSetting, DisasterType, Region, RegionId, ValidationError};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Sample regions, thresholds, and routes used when no file is configured.
pub const SAMPLE_CONFIG: &str = include_str!("../regions.toml");

/// Returns the configuration document at `path`, or [`SAMPLE_CONFIG`] when
/// no path is given.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the file cannot be read.
pub fn read_config(path: Option<&Path>) -> Result<String, RegistryError> {
    match path {
        Some(path) => {
            log::debug!("Reading region config from {}", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            log::info!("No region config given, using the embedded sample");
            Ok(SAMPLE_CONFIG.to_string())
        }
    }
}

/// Errors from loading or mutating the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is not valid TOML for this schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A region or threshold failed validation.
    #[error("Invalid region {region_id}: {source}")]
    Validation {
        /// Region the invalid entry belongs to.
        region_id: RegionId,
        /// What was wrong with it.
        source: ValidationError,
    },

    /// Two regions share an id.
    #[error("Duplicate region id {region_id}")]
    DuplicateRegion {
        /// The repeated id.
        region_id: RegionId,
    },

    /// No region has the given id.
    #[error("Region {region_id} not found")]
    UnknownRegion {
        /// The id that was looked up.
        region_id: RegionId,
    },

    /// The region does not monitor the disaster type.
    #[error("Region {region_id} does not monitor {disaster_type}")]
    NotMonitored {
        /// Region the setting was for.
        region_id: RegionId,
        /// Disaster type the setting was for.
        disaster_type: DisasterType,
    },

    /// An alert setting already exists for the pair.
    #[error("Alert setting for region {region_id} and {disaster_type} already exists")]
    DuplicateSetting {
        /// Region the setting was for.
        region_id: RegionId,
        /// Disaster type the setting was for.
        disaster_type: DisasterType,
    },
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    regions: Vec<RegionEntry>,
    #[serde(default)]
    alert_settings: Vec<AlertSettingEntry>,
}

#[derive(Debug, Deserialize)]
struct RegionEntry {
    id: RegionId,
    name: String,
    latitude: f64,
    longitude: f64,
    disaster_types: Vec<DisasterType>,
}

#[derive(Debug, Deserialize)]
struct AlertSettingEntry {
    region_id: RegionId,
    disaster_type: DisasterType,
    threshold_score: f64,
}

#[derive(Debug, Default)]
struct Inner {
    regions: BTreeMap<RegionId, Region>,
    alert_settings: BTreeMap<(RegionId, DisasterType), AlertSetting>,
}

impl Inner {
    fn insert_region(&mut self, region: Region) -> Result<(), RegistryError> {
        if self.regions.contains_key(&region.id) {
            return Err(RegistryError::DuplicateRegion {
                region_id: region.id,
            });
        }
        self.regions.insert(region.id, region);
        Ok(())
    }

    fn insert_alert_setting(
        &mut self,
        region_id: RegionId,
        disaster_type: DisasterType,
        threshold_score: f64,
    ) -> Result<AlertSetting, RegistryError> {
        let region = self
            .regions
            .get(&region_id)
            .ok_or(RegistryError::UnknownRegion { region_id })?;

        if !region.monitors(disaster_type) {
            return Err(RegistryError::NotMonitored {
                region_id,
                disaster_type,
            });
        }

        let key = (region_id, disaster_type);
        if self.alert_settings.contains_key(&key) {
            return Err(RegistryError::DuplicateSetting {
                region_id,
                disaster_type,
            });
        }

        let setting = AlertSetting::new(region_id, disaster_type, threshold_score)
            .map_err(|source| RegistryError::Validation { region_id, source })?;
        self.alert_settings.insert(key, setting.clone());
        Ok(setting)
    }
}

/// Regions and alert settings held in memory.
#[derive(Debug)]
pub struct RegionRegistry {
    inner: RwLock<Inner>,
}

impl RegionRegistry {
    /// Builds a registry from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the document does not parse, a region
    /// is invalid or repeated, or an alert setting breaks the creation
    /// rules of [`Self::create_alert_setting`].
    pub fn from_toml_str(document: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(document)?;
        let mut inner = Inner::default();

        for entry in file.regions {
            let region_id = entry.id;
            let region = Region::new(
                region_id,
                entry.name,
                entry.latitude,
                entry.longitude,
                entry.disaster_types,
            )
            .map_err(|source| RegistryError::Validation { region_id, source })?;
            inner.insert_region(region)?;
        }

        for entry in file.alert_settings {
            inner.insert_alert_setting(entry.region_id, entry.disaster_type, entry.threshold_score)?;
        }

        log::info!(
            "Loaded {} regions and {} alert settings",
            inner.regions.len(),
            inner.alert_settings.len()
        );

        Ok(Self {
            inner: RwLock::new(inner),
        })
    }

    /// Creates the alert threshold for a (region, disaster type) pair.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::UnknownRegion`] if the region does not exist
    /// * [`RegistryError::NotMonitored`] if the region does not monitor
    ///   `disaster_type`
    /// * [`RegistryError::DuplicateSetting`] if the pair already has one
    /// * [`RegistryError::Validation`] if the threshold is outside
    ///   `[0, 100]`
    pub async fn create_alert_setting(
        &self,
        region_id: RegionId,
        disaster_type: DisasterType,
        threshold_score: f64,
    ) -> Result<AlertSetting, RegistryError> {
        let setting = self
            .inner
            .write()
            .await
            .insert_alert_setting(region_id, disaster_type, threshold_score)?;
        log::info!(
            "Created {disaster_type} alert setting for region {region_id} at {threshold_score}"
        );
        Ok(setting)
    }

    /// Returns every alert setting, ordered by region then disaster type.
    pub async fn alert_settings(&self) -> Vec<AlertSetting> {
        self.inner
            .read()
            .await
            .alert_settings
            .values()
            .cloned()
            .collect()
    }

    /// Returns the alert settings of one region.
    pub async fn alert_settings_for_region(&self, region_id: RegionId) -> Vec<AlertSetting> {
        self.inner
            .read()
            .await
            .alert_settings
            .values()
            .filter(|setting| setting.region_id == region_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RegionRepository for RegionRegistry {
    async fn find_region_by_id(&self, id: RegionId) -> Result<Option<Region>, RepositoryError> {
        Ok(self.inner.read().await.regions.get(&id).cloned())
    }

    async fn find_all_regions(&self) -> Result<Vec<Region>, RepositoryError> {
        Ok(self.inner.read().await.regions.values().cloned().collect())
    }
}

#[async_trait]
impl AlertSettingRepository for RegionRegistry {
    async fn find_threshold(
        &self,
        region_id: RegionId,
        disaster_type: DisasterType,
    ) -> Result<Option<f64>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .alert_settings
            .get(&(region_id, disaster_type))
            .map(|setting| setting.threshold_score))
    }
}
