#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for disaster risk assessment.
//!
//! Regions, alert thresholds and alert routes come from the TOML file
//! named by `--config` or `DISASTER_WATCH_CONFIG`, falling back to the
//! embedded sample. Scoring constants, cache TTL and provider endpoints
//! are read from the environment.

mod app;
mod watch;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use disaster_watch_alert::{AlertChannel, AlertRecord, DEFAULT_HISTORY_LIMIT};
use disaster_watch_providers::ProviderSettings;
use disaster_watch_registry::read_config;
use disaster_watch_risk::{AssessmentConfig, RegionRepository as _};
use disaster_watch_risk_models::{DisasterType, RegionId};

use crate::app::App;

#[derive(Parser)]
#[command(name = "disaster_watch", about = "Disaster risk assessment tool")]
struct Cli {
    /// Regions, alert settings and routes TOML file (overrides `DISASTER_WATCH_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one disaster type for one region and print the report as JSON
    Assess {
        /// Region identifier
        region_id: RegionId,
        /// Disaster type ("flood", "earthquake" or "wildfire")
        #[arg(value_parser = parse_disaster_type)]
        disaster_type: DisasterType,
    },
    /// Assess every monitored region once and print the sweep as JSON
    Sweep {
        /// Send alerts for triggered reports to their configured routes
        #[arg(long)]
        notify: bool,
    },
    /// Sweep on a fixed period, sending alerts, until interrupted
    Watch {
        /// Seconds between sweeps (overrides `RISK_FETCH_INTERVAL_SECS`)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// List monitored regions and their alert thresholds
    Regions,
    /// Assess a pair and send its alert to one recipient, whatever the score
    Alert {
        /// Region identifier
        region_id: RegionId,
        /// Disaster type ("flood", "earthquake" or "wildfire")
        #[arg(value_parser = parse_disaster_type)]
        disaster_type: DisasterType,
        /// Delivery channel ("sms" or "email")
        #[arg(long, value_parser = parse_channel)]
        channel: AlertChannel,
        /// Phone number or e-mail address
        #[arg(long)]
        recipient: String,
    },
    /// Sweep once, send alerts and print the alerts delivered in this run
    Alerts {
        /// Show the history of one region instead of the latest alert per region
        #[arg(long)]
        region_id: Option<RegionId>,
        /// Maximum number of alerts shown for `--region-id`
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
    /// Inspect or add alert thresholds
    #[command(subcommand)]
    AlertSetting(AlertSettingCommand),
}

#[derive(Subcommand)]
enum AlertSettingCommand {
    /// List every configured alert threshold
    List,
    /// Add a threshold for this run and assess the pair against it
    Create {
        /// Region identifier
        region_id: RegionId,
        /// Disaster type ("flood", "earthquake" or "wildfire")
        #[arg(value_parser = parse_disaster_type)]
        disaster_type: DisasterType,
        /// Alert when the risk score reaches this value (0 to 100)
        #[arg(long)]
        threshold: f64,
    },
}

fn parse_disaster_type(value: &str) -> Result<DisasterType, String> {
    value.parse().map_err(|_| {
        let known: Vec<&str> = DisasterType::all().iter().map(|t| t.as_ref()).collect();
        format!(
            "unknown disaster type: {value} (expected one of {})",
            known.join(", ")
        )
    })
}

fn parse_channel(value: &str) -> Result<AlertChannel, String> {
    value
        .parse()
        .map_err(|_| format!("unknown alert channel: {value}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| std::env::var_os("DISASTER_WATCH_CONFIG").map(PathBuf::from));
    let document = read_config(config_path.as_deref())?;
    let app = App::build(
        &document,
        AssessmentConfig::from_env()?,
        ProviderSettings::from_env(),
    )?;

    match cli.command {
        Commands::Assess {
            region_id,
            disaster_type,
        } => {
            let report = app.assessor.assess(region_id, disaster_type).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Sweep { notify } => {
            let sweep = app.assessor.assess_all().await?;
            println!("{}", serde_json::to_string_pretty(&sweep)?);
            if notify {
                app.dispatcher.dispatch(&sweep).await;
            }
        }
        Commands::Watch { interval_secs } => {
            let period = match interval_secs {
                Some(0) => return Err("--interval-secs must be positive".into()),
                Some(secs) => Duration::from_secs(secs),
                None => app.assessor.config().fetch_interval,
            };
            watch::run(&app, period).await;
        }
        Commands::Regions => {
            let regions = app.registry.find_all_regions().await?;
            println!("{:<6} {:<24} {:>10} {:>11}  DISASTER TYPES", "ID", "NAME", "LAT", "LON");
            println!("{}", "-".repeat(80));
            for region in &regions {
                let types: Vec<&str> = region.disaster_types.iter().map(|t| t.as_ref()).collect();
                println!(
                    "{:<6} {:<24} {:>10.4} {:>11.4}  {}",
                    region.id,
                    region.name,
                    region.latitude,
                    region.longitude,
                    types.join(", ")
                );
                for setting in app.registry.alert_settings_for_region(region.id).await {
                    println!(
                        "{:<6} alert on {} at score >= {}",
                        "", setting.disaster_type, setting.threshold_score
                    );
                }
            }
        }
        Commands::Alert {
            region_id,
            disaster_type,
            channel,
            recipient,
        } => {
            let report = app.assessor.assess(region_id, disaster_type).await?;
            app.dispatcher.notify(&report, channel, &recipient).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Alerts { region_id, limit } => {
            let sweep = app.assessor.assess_all().await?;
            app.dispatcher.dispatch(&sweep).await;

            let history = app.dispatcher.history();
            let records = match region_id {
                Some(region_id) => history.for_region(region_id, limit).await,
                None => history.latest_by_region().await,
            };
            print_alerts(&records);
        }
        Commands::AlertSetting(AlertSettingCommand::List) => {
            println!("{:<6} {:<12} {:>9}", "REGION", "TYPE", "THRESHOLD");
            println!("{}", "-".repeat(29));
            for setting in app.registry.alert_settings().await {
                println!(
                    "{:<6} {:<12} {:>9.2}",
                    setting.region_id, setting.disaster_type, setting.threshold_score
                );
            }
        }
        Commands::AlertSetting(AlertSettingCommand::Create {
            region_id,
            disaster_type,
            threshold,
        }) => {
            let setting = app
                .registry
                .create_alert_setting(region_id, disaster_type, threshold)
                .await?;
            println!("{}", serde_json::to_string_pretty(&setting)?);
            let report = app.assessor.assess(region_id, disaster_type).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_alerts(records: &[AlertRecord]) {
    if records.is_empty() {
        println!("No alerts sent");
        return;
    }

    println!(
        "{:<4} {:<25} {:<6} {:<20} {:<10} {:>6} {:<6}  RECIPIENT",
        "ID", "SENT AT", "REGION", "NAME", "TYPE", "SCORE", "LEVEL"
    );
    println!("{}", "-".repeat(100));
    for record in records {
        println!(
            "{:<4} {:<25} {:<6} {:<20} {:<10} {:>6.2} {:<6}  {} ({})",
            record.id,
            record.sent_at.format("%Y-%m-%d %H:%M:%S UTC"),
            record.region_id,
            record.region_name,
            record.disaster_type,
            record.risk_score,
            record.risk_level,
            record.recipient,
            record.channel
        );
    }
}
