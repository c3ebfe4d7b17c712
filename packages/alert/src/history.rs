//! In-memory log of delivered alerts.
//!
//! Every message a [`Messenger`](crate::Messenger) accepts is recorded with
//! the report figures it was built from. The log lives as long as the
//! process.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use disaster_watch_risk::DisasterRiskReport;
use disaster_watch_risk_models::{DisasterType, RegionId, RiskLevel};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::AlertChannel;

/// Number of records [`AlertLog::for_region`] callers get by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// One delivered alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    /// Sequence number, starting at 1, in recording order.
    pub id: u64,
    pub region_id: RegionId,
    pub region_name: String,
    pub disaster_type: DisasterType,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    /// Message body as sent.
    pub message: String,
    pub channel: AlertChannel,
    pub recipient: String,
    pub sent_at: DateTime<Utc>,
}

impl AlertRecord {
    fn newer_than(&self, other: &Self) -> bool {
        (self.sent_at, self.id) > (other.sent_at, other.id)
    }
}

/// Append-only alert history owned by the dispatcher.
#[derive(Debug, Default)]
pub struct AlertLog {
    records: RwLock<Vec<AlertRecord>>,
}

impl AlertLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a delivered alert for `report`, stamped with the current
    /// time, and returns the stored record.
    pub async fn record(
        &self,
        report: &DisasterRiskReport,
        channel: AlertChannel,
        recipient: &str,
        message: &str,
    ) -> AlertRecord {
        self.record_at(report, channel, recipient, message, Utc::now())
            .await
    }

    async fn record_at(
        &self,
        report: &DisasterRiskReport,
        channel: AlertChannel,
        recipient: &str,
        message: &str,
        sent_at: DateTime<Utc>,
    ) -> AlertRecord {
        let mut records = self.records.write().await;
        let record = AlertRecord {
            id: records.len() as u64 + 1,
            region_id: report.region_id(),
            region_name: report.region_name().to_string(),
            disaster_type: report.disaster_type(),
            risk_level: report.risk_level(),
            risk_score: report.risk_score(),
            message: message.to_string(),
            channel,
            recipient: recipient.to_string(),
            sent_at,
        };
        records.push(record.clone());
        record
    }

    /// The most recent alert of each region, ordered by region id.
    pub async fn latest_by_region(&self) -> Vec<AlertRecord> {
        let records = self.records.read().await;
        let mut latest: BTreeMap<RegionId, &AlertRecord> = BTreeMap::new();
        for record in records.iter() {
            latest
                .entry(record.region_id)
                .and_modify(|current| {
                    if record.newer_than(*current) {
                        *current = record;
                    }
                })
                .or_insert(record);
        }
        latest.into_values().cloned().collect()
    }

    /// Up to `limit` alerts of `region_id`, newest first.
    pub async fn for_region(&self, region_id: RegionId, limit: usize) -> Vec<AlertRecord> {
        let mut matching: Vec<AlertRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.region_id == region_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.sent_at, b.id).cmp(&(a.sent_at, a.id)));
        matching.truncate(limit);
        matching
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
