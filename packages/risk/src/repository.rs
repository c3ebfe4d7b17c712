//! Region and alert-setting lookup seams.

use async_trait::async_trait;
use disaster_watch_risk_models::{DisasterType, Region, RegionId};

/// Failure of the backing region or alert-setting store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Repository error: {message}")]
pub struct RepositoryError {
    /// Description of the failure.
    pub message: String,
}

/// Read access to monitored regions.
#[async_trait]
pub trait RegionRepository: Send + Sync {
    /// Looks up a region by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the store cannot be read.
    async fn find_region_by_id(&self, id: RegionId) -> Result<Option<Region>, RepositoryError>;

    /// Returns every monitored region.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the store cannot be read.
    async fn find_all_regions(&self) -> Result<Vec<Region>, RepositoryError>;
}

/// Read access to alert thresholds.
#[async_trait]
pub trait AlertSettingRepository: Send + Sync {
    /// Returns the configured threshold for a (region, disaster type)
    /// pair, or `None` if alerts are not configured for it.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the store cannot be read.
    async fn find_threshold(
        &self,
        region_id: RegionId,
        disaster_type: DisasterType,
    ) -> Result<Option<f64>, RepositoryError>;
}
