use crate::config::yaml_config::AlertsConfig;
use crate::domain::model::Alert;
use crate::domain::ports::Notifier;
use crate::utils::error::{PriceAlertError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// 在終端機輸出提醒
pub struct ConsoleNotifier {
    currency: String,
}

impl ConsoleNotifier {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn format(&self, alert: &Alert) -> String {
        format!(
            "🔔 {} at {}: {:.2} {} (threshold {:.2} {}) {}",
            alert.product,
            alert.shop_name,
            alert.price,
            self.currency,
            alert.threshold,
            self.currency,
            alert.url
        )
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn channel(&self) -> &str {
        "console"
    }

    async fn notify(&self, alert: &Alert) -> Result<()> {
        println!("{}", self.format(alert));
        Ok(())
    }
}

/// 把提醒以 JSON POST 到 webhook
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn channel(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, alert: &Alert) -> Result<()> {
        tracing::debug!("Posting alert for '{}' to {}", alert.product, self.url);
        let response = self.client.post(&self.url).json(alert).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceAlertError::NotificationError {
                channel: self.channel().to_string(),
                message: format!("webhook responded with {}", status),
            });
        }
        Ok(())
    }
}

/// 依 alerts 設定建立通知管道，webhook 沿用 settings.timeout_seconds
pub fn build_notifiers(
    alerts: &AlertsConfig,
    currency: &str,
    timeout: Duration,
) -> Result<Vec<Box<dyn Notifier>>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if alerts.console {
        notifiers.push(Box::new(ConsoleNotifier::new(currency)));
    }
    if let Some(url) = &alerts.webhook_url {
        let client = Client::builder().timeout(timeout).build()?;
        notifiers.push(Box::new(WebhookNotifier::new(client, url.clone())));
    }
    Ok(notifiers)
}
