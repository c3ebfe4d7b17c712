//! Risk assessment orchestration.
//!
//! [`RiskAssessor::assess`] runs the cache-aside pipeline for one
//! (region, disaster type) pair:
//!
//! 1. Resolve the region.
//! 2. Read the cached payload; on a miss, fetch from the matching
//!    provider and write it back with the configured TTL.
//! 3. Score the payload.
//! 4. Look up the alert threshold and build the report.
//!
//! [`RiskAssessor::assess_all`] sweeps every monitored pair. A failing
//! pair is logged and recorded as skipped; it never aborts the sweep.

use std::sync::Arc;

use chrono::Utc;
use disaster_watch_risk_models::{DisasterType, Region, RegionId, RiskData};
use futures::stream::{self, StreamExt as _};

use crate::cache::{CacheKey, RiskCache};
use crate::config::{AssessmentConfig, SEISMIC_LOOKBACK_HOURS};
use crate::evaluator;
use crate::providers::{SeismicProvider, WeatherProvider};
use crate::report::{DisasterRiskReport, SkippedAssessment, SweepReport};
use crate::repository::{AlertSettingRepository, RegionRepository};
use crate::RiskError;

/// External collaborators of the assessor.
#[derive(Clone)]
pub struct Collaborators {
    /// Region lookup.
    pub regions: Arc<dyn RegionRepository>,
    /// Alert threshold lookup.
    pub alert_settings: Arc<dyn AlertSettingRepository>,
    /// Weather data for floods and wildfires.
    pub weather: Arc<dyn WeatherProvider>,
    /// Seismic data for earthquakes.
    pub seismic: Arc<dyn SeismicProvider>,
    /// Raw payload cache.
    pub cache: Arc<dyn RiskCache>,
}

/// Produces [`DisasterRiskReport`]s for monitored regions.
pub struct RiskAssessor {
    collaborators: Collaborators,
    config: AssessmentConfig,
}

impl RiskAssessor {
    #[must_use]
    pub const fn new(collaborators: Collaborators, config: AssessmentConfig) -> Self {
        Self {
            collaborators,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Assesses one disaster type for one region.
    ///
    /// # Errors
    ///
    /// * [`RiskError::NotFound`] if the region does not exist.
    /// * [`RiskError::Provider`] if fresh data was needed and the provider
    ///   failed.
    /// * [`RiskError::Repository`] if a lookup failed.
    pub async fn assess(
        &self,
        region_id: RegionId,
        disaster_type: DisasterType,
    ) -> Result<DisasterRiskReport, RiskError> {
        let region = self
            .collaborators
            .regions
            .find_region_by_id(region_id)
            .await?
            .ok_or(RiskError::NotFound { region_id })?;

        self.assess_region(&region, disaster_type).await
    }

    /// Assesses one disaster type for an already-resolved region.
    ///
    /// # Errors
    ///
    /// * [`RiskError::Provider`] if fresh data was needed and the provider
    ///   failed.
    /// * [`RiskError::Repository`] if the threshold lookup failed.
    pub async fn assess_region(
        &self,
        region: &Region,
        disaster_type: DisasterType,
    ) -> Result<DisasterRiskReport, RiskError> {
        let key = CacheKey::new(region.id, disaster_type);

        let data = if let Some(cached) = self.cached(&key, disaster_type).await {
            log::debug!("Using cached risk data for {key}");
            cached
        } else {
            log::debug!("Fetching fresh risk data for {key}");
            let fresh = self.fetch(region, disaster_type).await?;
            self.store(&key, &fresh).await;
            fresh
        };

        let evaluation = evaluator::evaluate(disaster_type, &data, &self.config.thresholds)?;

        let threshold = self
            .collaborators
            .alert_settings
            .find_threshold(region.id, disaster_type)
            .await?;

        Ok(DisasterRiskReport::new(
            region,
            disaster_type,
            evaluation.score,
            threshold,
            evaluation.details,
        ))
    }

    /// Assesses every disaster type of every monitored region.
    ///
    /// Pairs run `sweep_concurrency` at a time; reports keep region then
    /// disaster-type order regardless. Failed pairs are logged and listed
    /// in [`SweepReport::skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Repository`] only if the region list itself
    /// cannot be read.
    pub async fn assess_all(&self) -> Result<SweepReport, RiskError> {
        log::info!("Starting disaster risk assessment");

        let regions = self.collaborators.regions.find_all_regions().await?;
        let pairs: Vec<(&Region, DisasterType)> = regions
            .iter()
            .flat_map(|region| {
                region
                    .disaster_types
                    .iter()
                    .map(move |&disaster_type| (region, disaster_type))
            })
            .collect();

        let outcomes: Vec<_> = stream::iter(pairs.into_iter().map(|(region, disaster_type)| {
            async move {
                let result = self.assess_region(region, disaster_type).await;
                (region.id, disaster_type, result)
            }
        }))
        .buffered(self.config.sweep_concurrency.max(1))
        .collect()
        .await;

        let mut reports = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (region_id, disaster_type, result) in outcomes {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    log::error!("Failed to assess {disaster_type} risk for region {region_id}: {e}");
                    skipped.push(SkippedAssessment {
                        region_id,
                        disaster_type,
                        error: e.to_string(),
                    });
                }
            }
        }

        let sweep = SweepReport {
            reports,
            timestamp: Utc::now(),
            skipped,
        };

        log::info!(
            "Disaster risk assessment finished: {} reports, {} triggered, {} skipped",
            sweep.reports.len(),
            sweep.triggered().count(),
            sweep.skipped_count()
        );

        Ok(sweep)
    }

    /// Reads the cache, degrading every failure to a miss.
    async fn cached(&self, key: &CacheKey, disaster_type: DisasterType) -> Option<RiskData> {
        match self.collaborators.cache.get(key).await {
            Ok(Some(data)) if data.is_for(disaster_type) => Some(data),
            Ok(Some(data)) => {
                log::warn!(
                    "Ignoring cached {} payload under {key}, refetching",
                    data.kind()
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Risk cache read failed for {key}, treating as miss: {e}");
                None
            }
        }
    }

    /// Writes the cache; failures are logged and dropped.
    async fn store(&self, key: &CacheKey, data: &RiskData) {
        if let Err(e) = self
            .collaborators
            .cache
            .set(key, data, self.config.cache_ttl)
            .await
        {
            log::warn!("Risk cache write failed for {key}: {e}");
        }
    }

    async fn fetch(
        &self,
        region: &Region,
        disaster_type: DisasterType,
    ) -> Result<RiskData, RiskError> {
        let data = match disaster_type {
            DisasterType::Flood | DisasterType::Wildfire => RiskData::Weather {
                weather: self
                    .collaborators
                    .weather
                    .fetch_weather(region.latitude, region.longitude)
                    .await?,
            },
            DisasterType::Earthquake => RiskData::Seismic {
                event: self
                    .collaborators
                    .seismic
                    .fetch_seismic_activity(
                        region.latitude,
                        region.longitude,
                        self.config.seismic_radius_km,
                        SEISMIC_LOOKBACK_HOURS,
                    )
                    .await?,
            },
        };
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::TimeZone as _;
    use disaster_watch_risk_models::{RiskLevel, SeismicSnapshot, WeatherSnapshot};

    use super::*;
    use crate::cache::{CacheError, MemoryRiskCache};
    use crate::providers::ProviderError;
    use crate::report::{NO_SEISMIC_ACTIVITY_MESSAGE, RiskDetails};
    use crate::repository::RepositoryError;

    struct FakeRegions {
        regions: Vec<Region>,
    }

    #[async_trait]
    impl RegionRepository for FakeRegions {
        async fn find_region_by_id(&self, id: RegionId) -> Result<Option<Region>, RepositoryError> {
            Ok(self.regions.iter().find(|r| r.id == id).cloned())
        }

        async fn find_all_regions(&self) -> Result<Vec<Region>, RepositoryError> {
            Ok(self.regions.clone())
        }
    }

    struct BrokenRegions;

    #[async_trait]
    impl RegionRepository for BrokenRegions {
        async fn find_region_by_id(&self, _id: RegionId) -> Result<Option<Region>, RepositoryError> {
            Err(RepositoryError {
                message: "connection refused".to_string(),
            })
        }

        async fn find_all_regions(&self) -> Result<Vec<Region>, RepositoryError> {
            Err(RepositoryError {
                message: "connection refused".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct FakeSettings {
        thresholds: BTreeMap<(RegionId, DisasterType), f64>,
    }

    #[async_trait]
    impl AlertSettingRepository for FakeSettings {
        async fn find_threshold(
            &self,
            region_id: RegionId,
            disaster_type: DisasterType,
        ) -> Result<Option<f64>, RepositoryError> {
            Ok(self.thresholds.get(&(region_id, disaster_type)).copied())
        }
    }

    /// Returns `reading` everywhere except at latitudes listed in
    /// `failing_latitudes`.
    struct FakeWeather {
        reading: WeatherSnapshot,
        failing_latitudes: Vec<f64>,
        calls: AtomicUsize,
    }

    impl FakeWeather {
        fn new(reading: WeatherSnapshot) -> Self {
            Self {
                reading,
                failing_latitudes: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn fetch_weather(
            &self,
            latitude: f64,
            _longitude: f64,
        ) -> Result<WeatherSnapshot, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self
                .failing_latitudes
                .iter()
                .any(|failing| (failing - latitude).abs() < f64::EPSILON)
            {
                return Err(ProviderError::Transport {
                    message: "timed out".to_string(),
                });
            }
            Ok(self.reading.clone())
        }
    }

    struct FakeSeismic {
        event: Option<SeismicSnapshot>,
        requests: Mutex<Vec<(f64, u32)>>,
    }

    impl FakeSeismic {
        fn new(event: Option<SeismicSnapshot>) -> Self {
            Self {
                event,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SeismicProvider for FakeSeismic {
        async fn fetch_seismic_activity(
            &self,
            _latitude: f64,
            _longitude: f64,
            radius_km: f64,
            lookback_hours: u32,
        ) -> Result<Option<SeismicSnapshot>, ProviderError> {
            self.requests
                .lock()
                .unwrap()
                .push((radius_km, lookback_hours));
            Ok(self.event.clone())
        }
    }

    struct FailingCache {
        writes: AtomicUsize,
    }

    #[async_trait]
    impl RiskCache for FailingCache {
        async fn get(&self, _key: &CacheKey) -> Result<Option<RiskData>, CacheError> {
            Err(CacheError::Unavailable {
                message: "connection reset".to_string(),
            })
        }

        async fn set(
            &self,
            _key: &CacheKey,
            _value: &RiskData,
            _ttl: Duration,
        ) -> Result<(), CacheError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(CacheError::Unavailable {
                message: "connection reset".to_string(),
            })
        }
    }

    fn weather(temperature: f64, humidity: f64, rainfall: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            humidity,
            rainfall,
            description: "light rain".to_string(),
        }
    }

    fn quake(magnitude: f64) -> SeismicSnapshot {
        SeismicSnapshot {
            magnitude,
            depth: 15.2,
            place: "20 km N of Hualien City, Taiwan".to_string(),
            time: Utc.with_ymd_and_hms(2025, 10, 28, 4, 12, 0).unwrap(),
        }
    }

    fn region(id: RegionId, latitude: f64, types: &[DisasterType]) -> Region {
        Region::new(id, format!("Region {id}"), latitude, 100.0, types.iter().copied()).unwrap()
    }

    struct Harness {
        assessor: RiskAssessor,
        weather: Arc<FakeWeather>,
        seismic: Arc<FakeSeismic>,
        cache: Arc<MemoryRiskCache>,
    }

    fn harness(
        regions: Vec<Region>,
        settings: FakeSettings,
        weather: FakeWeather,
        seismic: FakeSeismic,
    ) -> Harness {
        let weather = Arc::new(weather);
        let seismic = Arc::new(seismic);
        let cache = Arc::new(MemoryRiskCache::new());
        let assessor = RiskAssessor::new(
            Collaborators {
                regions: Arc::new(FakeRegions { regions }),
                alert_settings: Arc::new(settings),
                weather: weather.clone(),
                seismic: seismic.clone(),
                cache: cache.clone(),
            },
            AssessmentConfig::default(),
        );
        Harness {
            assessor,
            weather,
            seismic,
            cache,
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_provider() {
        let h = harness(
            vec![region(1, 13.7, &[DisasterType::Flood])],
            FakeSettings::default(),
            FakeWeather::new(weather(30.0, 80.0, 0.0)),
            FakeSeismic::new(None),
        );
        h.cache
            .set(
                &CacheKey::new(1, DisasterType::Flood),
                &RiskData::Weather {
                    weather: weather(30.0, 80.0, 25.0),
                },
                Duration::from_secs(900),
            )
            .await
            .unwrap();

        let report = h.assessor.assess(1, DisasterType::Flood).await.unwrap();

        assert_eq!(h.weather.calls(), 0);
        assert!((report.risk_score() - 50.0).abs() < 1e-9);
        assert_eq!(report.risk_level(), RiskLevel::Medium);
    }

    #[tokio::test]
    async fn cache_miss_fetches_once_and_populates_cache() {
        let h = harness(
            vec![region(1, 13.7, &[DisasterType::Flood])],
            FakeSettings::default(),
            FakeWeather::new(weather(30.0, 80.0, 10.0)),
            FakeSeismic::new(None),
        );

        h.assessor.assess(1, DisasterType::Flood).await.unwrap();
        h.assessor.assess(1, DisasterType::Flood).await.unwrap();

        assert_eq!(h.weather.calls(), 1);
        assert_eq!(h.cache.len().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_refetched() {
        let h = harness(
            vec![region(1, 13.7, &[DisasterType::Wildfire])],
            FakeSettings::default(),
            FakeWeather::new(weather(30.0, 40.0, 0.0)),
            FakeSeismic::new(None),
        );

        h.assessor.assess(1, DisasterType::Wildfire).await.unwrap();
        tokio::time::advance(Duration::from_secs(901)).await;
        h.assessor.assess(1, DisasterType::Wildfire).await.unwrap();

        assert_eq!(h.weather.calls(), 2);
    }

    #[tokio::test]
    async fn flood_and_wildfire_share_provider_but_not_cache_entries() {
        let h = harness(
            vec![region(1, 13.7, &[DisasterType::Flood, DisasterType::Wildfire])],
            FakeSettings::default(),
            FakeWeather::new(weather(30.0, 40.0, 0.0)),
            FakeSeismic::new(None),
        );

        h.assessor.assess(1, DisasterType::Flood).await.unwrap();
        h.assessor.assess(1, DisasterType::Wildfire).await.unwrap();

        assert_eq!(h.weather.calls(), 2);
        assert_eq!(h.cache.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_region_is_not_found() {
        let h = harness(
            Vec::new(),
            FakeSettings::default(),
            FakeWeather::new(weather(30.0, 40.0, 0.0)),
            FakeSeismic::new(None),
        );

        let err = h.assessor.assess(99, DisasterType::Flood).await.unwrap_err();
        assert!(matches!(err, RiskError::NotFound { region_id: 99 }));
        assert_eq!(h.weather.calls(), 0);
    }

    #[tokio::test]
    async fn provider_failure_propagates_for_single_assessment() {
        let mut failing = FakeWeather::new(weather(30.0, 40.0, 0.0));
        failing.failing_latitudes.push(13.7);
        let h = harness(
            vec![region(1, 13.7, &[DisasterType::Flood])],
            FakeSettings::default(),
            failing,
            FakeSeismic::new(None),
        );

        let err = h.assessor.assess(1, DisasterType::Flood).await.unwrap_err();
        assert!(matches!(err, RiskError::Provider(ProviderError::Transport { .. })));
        assert!(h.cache.is_empty().unwrap());
    }

    #[tokio::test]
    async fn cache_failures_degrade_to_fresh_fetch() {
        let weather_provider = Arc::new(FakeWeather::new(weather(30.0, 40.0, 5.0)));
        let cache = Arc::new(FailingCache {
            writes: AtomicUsize::new(0),
        });
        let assessor = RiskAssessor::new(
            Collaborators {
                regions: Arc::new(FakeRegions {
                    regions: vec![region(1, 13.7, &[DisasterType::Flood])],
                }),
                alert_settings: Arc::new(FakeSettings::default()),
                weather: weather_provider.clone(),
                seismic: Arc::new(FakeSeismic::new(None)),
                cache: cache.clone(),
            },
            AssessmentConfig::default(),
        );

        let report = assessor.assess(1, DisasterType::Flood).await.unwrap();

        assert!((report.risk_score() - 10.0).abs() < 1e-9);
        assert_eq!(weather_provider.calls(), 1);
        assert_eq!(cache.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn mismatched_cached_payload_is_refetched() {
        let h = harness(
            vec![region(1, 13.7, &[DisasterType::Flood])],
            FakeSettings::default(),
            FakeWeather::new(weather(30.0, 40.0, 50.0)),
            FakeSeismic::new(None),
        );
        h.cache
            .set(
                &CacheKey::new(1, DisasterType::Flood),
                &RiskData::Seismic { event: None },
                Duration::from_secs(900),
            )
            .await
            .unwrap();

        let report = h.assessor.assess(1, DisasterType::Flood).await.unwrap();

        assert_eq!(h.weather.calls(), 1);
        assert!((report.risk_score() - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn heavy_rain_triggers_configured_alert() {
        let mut settings = FakeSettings::default();
        settings.thresholds.insert((1, DisasterType::Flood), 80.0);
        let h = harness(
            vec![region(1, 13.7, &[DisasterType::Flood])],
            settings,
            FakeWeather::new(weather(24.0, 95.0, 60.0)),
            FakeSeismic::new(None),
        );

        let report = h.assessor.assess(1, DisasterType::Flood).await.unwrap();

        assert!((report.risk_score() - 100.0).abs() < 1e-9);
        assert_eq!(report.risk_level(), RiskLevel::High);
        assert!(report.alert_triggered());
        assert_eq!(report.region_name(), "Region 1");
        assert_eq!(
            report.details(),
            &RiskDetails::Flood {
                rainfall: 60.0,
                humidity: 95.0,
                description: "light rain".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unconfigured_threshold_never_alerts() {
        let h = harness(
            vec![region(1, 13.7, &[DisasterType::Wildfire])],
            FakeSettings::default(),
            FakeWeather::new(weather(36.0, 20.0, 0.0)),
            FakeSeismic::new(None),
        );

        let report = h.assessor.assess(1, DisasterType::Wildfire).await.unwrap();

        assert!((report.risk_score() - 100.0).abs() < 1e-9);
        assert!(!report.alert_triggered());
    }

    #[tokio::test]
    async fn quiet_seismic_window_scores_zero() {
        let mut settings = FakeSettings::default();
        settings.thresholds.insert((1, DisasterType::Earthquake), 10.0);
        settings.thresholds.insert((2, DisasterType::Earthquake), 0.0);
        let h = harness(
            vec![
                region(1, 35.0, &[DisasterType::Earthquake]),
                region(2, 36.0, &[DisasterType::Earthquake]),
            ],
            settings,
            FakeWeather::new(weather(20.0, 50.0, 0.0)),
            FakeSeismic::new(None),
        );

        let report = h.assessor.assess(1, DisasterType::Earthquake).await.unwrap();
        assert!(report.risk_score().abs() < f64::EPSILON);
        assert_eq!(report.risk_level(), RiskLevel::Low);
        assert!(!report.alert_triggered());
        assert_eq!(
            report.details(),
            &RiskDetails::NoSeismicActivity {
                message: NO_SEISMIC_ACTIVITY_MESSAGE,
            }
        );

        let report = h.assessor.assess(2, DisasterType::Earthquake).await.unwrap();
        assert!(report.alert_triggered());
    }

    #[tokio::test]
    async fn seismic_lookup_uses_configured_radius_and_fixed_lookback() {
        let h = harness(
            vec![region(1, 35.0, &[DisasterType::Earthquake])],
            FakeSettings::default(),
            FakeWeather::new(weather(20.0, 50.0, 0.0)),
            FakeSeismic::new(Some(quake(5.4))),
        );

        let report = h.assessor.assess(1, DisasterType::Earthquake).await.unwrap();

        assert!((report.risk_score() - 100.0).abs() < f64::EPSILON);
        assert_eq!(*h.seismic.requests.lock().unwrap(), vec![(100.0, 24)]);
    }

    #[tokio::test]
    async fn sweep_skips_failing_region_and_keeps_the_rest() {
        let mut failing = FakeWeather::new(weather(30.0, 40.0, 20.0));
        failing.failing_latitudes.push(20.0);
        let h = harness(
            vec![
                region(1, 10.0, &[DisasterType::Flood]),
                region(2, 20.0, &[DisasterType::Flood]),
                region(3, 30.0, &[DisasterType::Flood]),
            ],
            FakeSettings::default(),
            failing,
            FakeSeismic::new(None),
        );

        let sweep = h.assessor.assess_all().await.unwrap();

        assert_eq!(sweep.reports.len(), 2);
        let ids: Vec<RegionId> = sweep.reports.iter().map(DisasterRiskReport::region_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(sweep.skipped_count(), 1);
        assert_eq!(sweep.skipped[0].region_id, 2);
        assert_eq!(sweep.skipped[0].disaster_type, DisasterType::Flood);
    }

    #[tokio::test]
    async fn sweep_covers_every_monitored_type_in_order() {
        let mut settings = FakeSettings::default();
        settings.thresholds.insert((2, DisasterType::Wildfire), 50.0);
        let h = harness(
            vec![
                region(1, 10.0, &[DisasterType::Earthquake, DisasterType::Flood]),
                region(2, 20.0, &[DisasterType::Wildfire]),
            ],
            settings,
            FakeWeather::new(weather(36.0, 20.0, 5.0)),
            FakeSeismic::new(Some(quake(3.5))),
        );

        let sweep = h.assessor.assess_all().await.unwrap();

        let pairs: Vec<(RegionId, DisasterType)> = sweep
            .reports
            .iter()
            .map(|r| (r.region_id(), r.disaster_type()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (1, DisasterType::Earthquake),
                (1, DisasterType::Flood),
                (2, DisasterType::Wildfire),
            ]
        );
        assert_eq!(sweep.triggered().count(), 1);
        assert_eq!(sweep.skipped_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_sweep_preserves_isolation_and_order() {
        let mut failing = FakeWeather::new(weather(30.0, 40.0, 20.0));
        failing.failing_latitudes.push(30.0);
        let regions: Vec<Region> = (1..=6_u32)
            .map(|n| region(u64::from(n), f64::from(n) * 10.0, &[DisasterType::Flood]))
            .collect();
        let weather_provider = Arc::new(failing);
        let assessor = RiskAssessor::new(
            Collaborators {
                regions: Arc::new(FakeRegions { regions }),
                alert_settings: Arc::new(FakeSettings::default()),
                weather: weather_provider.clone(),
                seismic: Arc::new(FakeSeismic::new(None)),
                cache: Arc::new(MemoryRiskCache::new()),
            },
            AssessmentConfig {
                sweep_concurrency: 4,
                ..AssessmentConfig::default()
            },
        );

        let sweep = assessor.assess_all().await.unwrap();

        let ids: Vec<RegionId> = sweep.reports.iter().map(DisasterRiskReport::region_id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 6]);
        assert_eq!(sweep.skipped_count(), 1);
        assert_eq!(weather_provider.calls(), 6);
    }

    #[tokio::test]
    async fn sweep_fails_only_when_regions_cannot_be_listed() {
        let assessor = RiskAssessor::new(
            Collaborators {
                regions: Arc::new(BrokenRegions),
                alert_settings: Arc::new(FakeSettings::default()),
                weather: Arc::new(FakeWeather::new(weather(30.0, 40.0, 0.0))),
                seismic: Arc::new(FakeSeismic::new(None)),
                cache: Arc::new(MemoryRiskCache::new()),
            },
            AssessmentConfig::default(),
        );

        assert!(matches!(
            assessor.assess_all().await,
            Err(RiskError::Repository(_))
        ));
    }
}
