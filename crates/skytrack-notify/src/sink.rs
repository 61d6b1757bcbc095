//! Notification delivery
//!
//! The engine hands finished notifications to a [`NotificationSink`].
//! [`WebhookSink`] posts them to an HTTP notification service;
//! [`LogSink`] only logs them, for deployments without one.

use crate::message::Notification;
use async_trait::async_trait;
use reqwest::Url;
use skytrack_core::config::NotificationConfig;
use skytrack_core::error::NotifyError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Delivery timeout for webhook requests.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers notifications to a device.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, device: &str, notification: &Notification) -> Result<(), NotifyError>;
}

/// Chooses the sink for a configuration: webhook when a URL is set, log otherwise.
pub fn sink_for(config: &NotificationConfig, http: reqwest::Client) -> Arc<dyn NotificationSink> {
    match config.webhook_url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => Arc::new(WebhookSink::new(http, url, config.token.clone())),
        None => Arc::new(LogSink),
    }
}

/// Posts notifications as JSON to `{base_url}/{device}`.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl WebhookSink {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// `base_url` with the device appended as one percent-encoded path segment.
    fn endpoint(&self, device: &str) -> Result<Url, NotifyError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| NotifyError::delivery_failed(device, format!("Invalid webhook URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| NotifyError::delivery_failed(device, "Webhook URL cannot take a path"))?
            .pop_if_empty()
            .push(device);
        Ok(url)
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, device: &str, notification: &Notification) -> Result<(), NotifyError> {
        let mut request = self
            .http
            .post(self.endpoint(device)?)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&notification.payload());

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::delivery_failed(device, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                device: device.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(device, title = %notification.title, "Sent notification");
        Ok(())
    }
}

/// Logs notifications instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, device: &str, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            device,
            kind = %notification.kind,
            hex = %notification.hex,
            title = %notification.title,
            message = %notification.message,
            "Notification"
        );
        Ok(())
    }
}
