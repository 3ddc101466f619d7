//! Cloudflare v4 record lookup and mutation.

use crate::domain::model::RecordRef;
use crate::domain::ports::DnsProvider;
use crate::utils::error::{DnscfError, Result};
use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare API 通用響應
#[derive(Debug, Deserialize)]
struct CloudflareResponse<T> {
    success: bool,
    result: Option<T>,
    errors: Option<Vec<CloudflareApiError>>,
}

#[derive(Debug, Deserialize)]
struct CloudflareApiError {
    #[allow(dead_code)]
    code: i32,
    message: String,
}

#[derive(Debug, Deserialize)]
struct CloudflareDnsRecord {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct UpdateRecordBody<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
}

pub struct CloudflareDns {
    client: Client,
    api_base: String,
    api_token: String,
    zone_id: String,
    timeout: Duration,
}

impl CloudflareDns {
    /// `api_base` is a parameter so tests can point at a mock server;
    /// production callers pass [`CF_API_BASE`].
    pub fn new(api_base: String, api_token: String, zone_id: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_base,
            api_token,
            zone_id,
            timeout,
        }
    }

    fn envelope_error<T>(response: CloudflareResponse<T>) -> DnscfError {
        let message = response
            .errors
            .and_then(|errors| errors.into_iter().next().map(|e| e.message))
            .unwrap_or_else(|| "Unknown error".to_string());
        DnscfError::ProviderError { message }
    }
}

#[async_trait]
impl DnsProvider for CloudflareDns {
    /// Lists the whole zone and filters by exact name client-side,
    /// preserving API order.
    async fn list_records(&self, name: &str) -> Result<Vec<RecordRef>> {
        let url = format!("{}/zones/{}/dns_records", self.api_base, self.zone_id);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DnscfError::ProviderError {
                message: format!("list_records returned status {}: {}", status, body),
            });
        }

        let envelope: CloudflareResponse<Vec<CloudflareDnsRecord>> = response.json().await?;
        if !envelope.success {
            return Err(Self::envelope_error(envelope));
        }

        let records = envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .filter(|record| record.name == name)
            .map(|record| RecordRef {
                id: record.id,
                name: record.name,
            })
            .collect();
        Ok(records)
    }

    /// Overwrites the record content with `ip`, resetting the type to A.
    async fn update_record(&self, record: &RecordRef, ip: &str) -> Result<()> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.api_base, self.zone_id, record.id
        );
        let body = UpdateRecordBody {
            record_type: "A",
            name: &record.name,
            content: ip,
        };
        tracing::debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DnscfError::ProviderError {
                message: format!("update_record returned status {}: {}", status, body),
            });
        }

        let envelope: CloudflareResponse<CloudflareDnsRecord> = response.json().await?;
        if !envelope.success {
            return Err(Self::envelope_error(envelope));
        }

        tracing::info!(
            "cf_dns_change success ---- Time: {} ---- ip: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            ip
        );
        Ok(())
    }
}
