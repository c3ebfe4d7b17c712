//! Fan-out of triggered reports to their routes.

use std::sync::Arc;

use disaster_watch_risk::{DisasterRiskReport, SweepReport};

use crate::history::AlertLog;
use crate::message::{ALERT_SUBJECT, compose_alert_message};
use crate::messenger::{DeliveryError, Messenger};
use crate::{AlertChannel, AlertRoute};

/// Counts from one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Messages delivered.
    pub sent: usize,
    /// Messages the messenger rejected.
    pub failed: usize,
    /// Triggered reports with no matching route.
    pub unrouted: usize,
}

/// Sends alert messages for triggered reports and records each
/// delivered message in its [`AlertLog`].
pub struct AlertDispatcher {
    messenger: Arc<dyn Messenger>,
    routes: Vec<AlertRoute>,
    history: AlertLog,
}

impl AlertDispatcher {
    #[must_use]
    pub fn new(messenger: Arc<dyn Messenger>, routes: Vec<AlertRoute>) -> Self {
        Self {
            messenger,
            routes,
            history: AlertLog::new(),
        }
    }

    #[must_use]
    pub fn routes(&self) -> &[AlertRoute] {
        &self.routes
    }

    #[must_use]
    pub fn history(&self) -> &AlertLog {
        &self.history
    }

    /// Sends one message per (triggered report, matching route).
    ///
    /// Delivery failures are logged and counted; they never stop the
    /// remaining sends.
    pub async fn dispatch(&self, sweep: &SweepReport) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for report in sweep.triggered() {
            let mut routes = self
                .routes
                .iter()
                .filter(|route| route.matches(report.region_id(), report.disaster_type()))
                .peekable();

            if routes.peek().is_none() {
                log::warn!(
                    "No alert route for region {} ({}), {} alert not sent",
                    report.region_id(),
                    report.region_name(),
                    report.disaster_type()
                );
                summary.unrouted += 1;
                continue;
            }

            let body = compose_alert_message(report);
            for route in routes {
                match self
                    .messenger
                    .send(route.channel, &route.recipient, ALERT_SUBJECT, &body)
                    .await
                {
                    Ok(()) => {
                        self.history
                            .record(report, route.channel, &route.recipient, &body)
                            .await;
                        summary.sent += 1;
                    }
                    Err(e) => {
                        log::error!("{e}");
                        summary.failed += 1;
                    }
                }
            }
        }

        log::info!(
            "Alert dispatch: {} sent, {} failed, {} unrouted",
            summary.sent,
            summary.failed,
            summary.unrouted
        );

        summary
    }

    /// Sends the alert for `report` to a single recipient, whether or not
    /// the report's alert condition is met.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the messenger rejects the message.
    pub async fn notify(
        &self,
        report: &DisasterRiskReport,
        channel: AlertChannel,
        recipient: &str,
    ) -> Result<(), DeliveryError> {
        let body = compose_alert_message(report);
        self.messenger
            .send(channel, recipient, ALERT_SUBJECT, &body)
            .await?;
        self.history
            .record(report, channel, recipient, &body)
            .await;
        log::info!(
            "Sent {} alert for region {} to {recipient} via {channel}",
            report.disaster_type(),
            report.region_id()
        );
        Ok(())
    }
}
