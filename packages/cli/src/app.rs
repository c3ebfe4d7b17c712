//! Wiring of the registry, providers, cache, assessor and dispatcher.

use std::sync::Arc;

use disaster_watch_alert::{AlertDispatcher, SimulatedMessenger, routes_from_toml_str};
use disaster_watch_providers::{HttpProviders, ProviderSettings};
use disaster_watch_registry::RegionRegistry;
use disaster_watch_risk::{AssessmentConfig, Collaborators, MemoryRiskCache, RiskAssessor};

pub struct App {
    pub registry: Arc<RegionRegistry>,
    pub cache: Arc<MemoryRiskCache>,
    pub assessor: RiskAssessor,
    pub dispatcher: AlertDispatcher,
}

impl App {
    /// Builds the application from a configuration document.
    pub fn build(
        document: &str,
        config: AssessmentConfig,
        settings: ProviderSettings,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Arc::new(RegionRegistry::from_toml_str(document)?);
        let routes = routes_from_toml_str(document)?;
        let providers = HttpProviders::new(settings)?;
        let cache = Arc::new(MemoryRiskCache::new());

        log::debug!(
            "Assessment config: cache TTL {:?}, seismic radius {} km, sweep concurrency {}",
            config.cache_ttl,
            config.seismic_radius_km,
            config.sweep_concurrency
        );

        let assessor = RiskAssessor::new(
            Collaborators {
                regions: registry.clone(),
                alert_settings: registry.clone(),
                weather: Arc::new(providers.weather),
                seismic: Arc::new(providers.seismic),
                cache: cache.clone(),
            },
            config,
        );

        let dispatcher = AlertDispatcher::new(Arc::new(SimulatedMessenger), routes);

        Ok(Self {
            registry,
            cache,
            assessor,
            dispatcher,
        })
    }
}

#[cfg(test)]
mod tests {
    use disaster_watch_registry::SAMPLE_CONFIG;
    use disaster_watch_risk::RegionRepository as _;

    use super::*;

    #[tokio::test]
    async fn builds_from_sample_config() {
        let app = App::build(
            SAMPLE_CONFIG,
            AssessmentConfig::default(),
            ProviderSettings::default(),
        )
        .unwrap();

        assert_eq!(app.registry.find_all_regions().await.unwrap().len(), 3);
        assert_eq!(app.dispatcher.routes().len(), 3);
        assert!(app.cache.is_empty().unwrap());
        assert_eq!(app.assessor.config(), &AssessmentConfig::default());
    }

    #[test]
    fn rejects_malformed_routes() {
        let document = r#"
[[routes]]
region_id = 1
channel = "carrier-pigeon"
recipient = "coop"
"#;
        assert!(
            App::build(
                document,
                AssessmentConfig::default(),
                ProviderSettings::default()
            )
            .is_err()
        );
    }
}
