//! Candidate discovery from the uouin.com Cloudflare ranking table.
//!
//! The page is an HTML table where the first column is the ISP line label
//! and the second the address. Row order encodes the source's preference
//! ranking and is preserved.

use crate::domain::ports::IpSource;
use crate::utils::error::{DnscfError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::net::Ipv4Addr;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://api.uouin.com/cloudflare.html";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("hard-coded regex"))
}

fn cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("hard-coded regex"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]+>").expect("hard-coded regex"))
}

fn cell_text(raw: &str) -> String {
    tag_re().replace_all(raw, "").trim().to_string()
}

/// Extracts candidate IPs from the page source: rows whose line label
/// contains `line_label` (substring, case-sensitive), IPv6 excluded,
/// dotted-quad only, deduplicated preserving first occurrence.
pub fn parse_candidates(html: &str, line_label: &str) -> Vec<String> {
    let mut ips: Vec<String> = Vec::new();

    for row in row_re().captures_iter(html) {
        let cells: Vec<String> = cell_re()
            .captures_iter(&row[1])
            .map(|c| cell_text(&c[1]))
            .collect();
        if cells.len() < 2 {
            continue;
        }

        let line_type = &cells[0];
        let address = &cells[1];

        if !line_type.contains(line_label) || address.is_empty() {
            continue;
        }
        // 排除IPv6地址
        if address.contains(':') {
            continue;
        }
        if address.parse::<Ipv4Addr>().is_err() {
            continue;
        }
        if !ips.iter().any(|ip| ip == address) {
            ips.push(address.clone());
        }
    }

    ips
}

pub struct UouinSource {
    client: Client,
    url: String,
    line_label: String,
    max_retries: usize,
    retry_delay: Duration,
    timeout: Duration,
}

impl UouinSource {
    pub fn new(
        url: String,
        line_label: String,
        max_retries: usize,
        retry_delay: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            url,
            line_label,
            max_retries,
            retry_delay,
            timeout,
        }
    }

    async fn fetch_once(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("source response status: {}", status);
        if !status.is_success() {
            return Err(DnscfError::SourceError {
                message: format!("source returned status {}", status),
            });
        }

        let html = response.text().await?;
        Ok(parse_candidates(&html, &self.line_label))
    }
}

#[async_trait]
impl IpSource for UouinSource {
    /// Bounded retry; anomalies are absorbed and exhaustion yields an
    /// empty list rather than an error.
    async fn fetch_candidates(&self) -> Result<Vec<String>> {
        for attempt in 1..=self.max_retries {
            tracing::info!(
                "fetching preferred IPs ({} line, attempt {}/{})",
                self.line_label,
                attempt,
                self.max_retries
            );

            match self.fetch_once().await {
                Ok(ips) if !ips.is_empty() => {
                    tracing::info!("got {} preferred IPs", ips.len());
                    return Ok(ips);
                }
                Ok(_) => {
                    tracing::warn!("no rows matched line label {}", self.line_label);
                }
                Err(e) => {
                    tracing::warn!("fetch attempt {} failed: {}", attempt, e);
                }
            }

            if attempt < self.max_retries && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Ok(Vec::new())
    }
}
