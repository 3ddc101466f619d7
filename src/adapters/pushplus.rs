//! pushplus.plus push notification delivery.

use crate::domain::ports::Notifier;
use crate::utils::error::{DnscfError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const PUSHPLUS_BASE: &str = "http://www.pushplus.plus";

#[derive(Debug, Serialize)]
struct PushBody<'a> {
    token: &'a str,
    title: &'a str,
    content: String,
    template: &'a str,
    channel: &'a str,
}

pub struct PushPlusNotifier {
    client: Client,
    api_base: String,
    token: String,
    title: String,
    timeout: Duration,
}

impl PushPlusNotifier {
    pub fn new(api_base: String, token: String, title: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_base,
            token,
            title,
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for PushPlusNotifier {
    /// One POST joining all outcome lines into a markdown body. The
    /// caller decides what to do with a delivery failure.
    async fn notify(&self, lines: &[String]) -> Result<()> {
        let body = PushBody {
            token: &self.token,
            title: &self.title,
            content: lines.join("\n"),
            template: "markdown",
            channel: "wechat",
        };

        let url = format!("{}/send", self.api_base);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DnscfError::ProviderError {
                message: format!("pushplus returned status {}", status),
            });
        }

        tracing::info!("notification delivered ({} lines)", lines.len());
        Ok(())
    }
}
