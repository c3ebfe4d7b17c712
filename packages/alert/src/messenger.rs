//! Message delivery seam.

use async_trait::async_trait;

use crate::AlertChannel;

/// Failure to deliver one message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to deliver {channel} alert to {recipient}: {message}")]
pub struct DeliveryError {
    /// Channel the message was sent through.
    pub channel: AlertChannel,
    /// Intended recipient.
    pub recipient: String,
    /// Transport-reported reason.
    pub message: String,
}

/// Sends alert text to a recipient.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Delivers `body` to `recipient`. `subject` is used by channels that
    /// have one (e-mail) and ignored otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the transport rejects the message.
    async fn send(
        &self,
        channel: AlertChannel,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), DeliveryError>;
}

/// Messenger that logs each message instead of sending it.
///
/// Used when no SMS or e-mail transport is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedMessenger;

#[async_trait]
impl Messenger for SimulatedMessenger {
    async fn send(
        &self,
        channel: AlertChannel,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        match channel {
            AlertChannel::Sms => {
                log::info!("[SMS SIMULATION] To: {recipient}\n{body}");
            }
            AlertChannel::Email => {
                log::info!("[EMAIL SIMULATION] To: {recipient}, Subject: {subject}\n{body}");
            }
        }
        Ok(())
    }
}
