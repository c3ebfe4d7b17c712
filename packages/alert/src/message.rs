//! Plain-text alert rendering.

use std::fmt::Write as _;

use disaster_watch_risk::DisasterRiskReport;

/// Subject line used for e-mail alerts.
pub const ALERT_SUBJECT: &str = "Disaster Risk Alert";

const CLOSING_LINE: &str =
    "Please take appropriate precautions and follow local emergency guidelines.";

/// Renders the alert text for a report.
///
/// The disaster type and risk level are upper-cased, the score is shown
/// with two decimals, and each detail is listed as `- key: value` in the
/// report's detail order.
#[must_use]
pub fn compose_alert_message(report: &DisasterRiskReport) -> String {
    let mut message = String::from("DISASTER ALERT\n\n");

    let _ = writeln!(message, "Region: {}", report.region_name());
    let _ = writeln!(
        message,
        "Disaster Type: {}",
        report.disaster_type().as_ref().to_uppercase()
    );
    let _ = writeln!(
        message,
        "Risk Level: {}",
        report.risk_level().as_ref().to_uppercase()
    );
    let _ = writeln!(message, "Risk Score: {:.2}", report.risk_score());

    message.push_str("\nDetails:\n");
    for (key, value) in report.details().entries() {
        let _ = writeln!(message, "- {key}: {value}");
    }

    message.push('\n');
    message.push_str(CLOSING_LINE);
    message
}
