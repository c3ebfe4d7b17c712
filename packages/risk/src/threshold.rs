//! Alert threshold check.

/// Returns `true` if an alert threshold is configured and `score` meets
/// or exceeds it. Without a configured threshold no alert is ever
/// triggered.
#[must_use]
pub fn alert_triggered(threshold: Option<f64>, score: f64) -> bool {
    threshold.is_some_and(|threshold| score >= threshold)
}
