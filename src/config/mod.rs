use crate::adapters::uouin::DEFAULT_SOURCE_URL;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use std::time::Duration;

/// Run configuration. Every key can come from the environment; the struct
/// is built once in `main` and passed by parameter, never read ambiently.
#[derive(Debug, Clone, Parser)]
#[command(name = "dnscf")]
#[command(about = "Repoints Cloudflare DNS records at preferred CDN edge IPs")]
pub struct JobConfig {
    #[arg(long, env = "CF_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    #[arg(long, env = "CF_ZONE_ID")]
    pub zone_id: String,

    /// Single domain, or comma-separated list for multi-domain mode.
    /// Emptiness is checked after discovery, matching the original job.
    #[arg(long, env = "CF_DNS_NAME", default_value = "")]
    pub dns_name: String,

    #[arg(long, env = "PUSHPLUS_TOKEN", hide_env_values = true)]
    pub pushplus_token: String,

    /// ISP line label rows must contain (substring match, e.g. 电信 / 联通)
    #[arg(long, env = "DNSCF_LINE", default_value = "电信")]
    pub line: String,

    #[arg(long, env = "DNSCF_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Discovery attempts before giving up
    #[arg(long, default_value = "3")]
    pub max_retries: usize,

    /// Sleep between discovery attempts, in seconds
    #[arg(long, default_value = "2")]
    pub retry_delay_secs: u64,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, default_value = "15")]
    pub timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl JobConfig {
    pub fn push_title(&self) -> String {
        format!("IP优选DNSCF推送({})", self.line)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api_token", &self.api_token)?;
        validate_non_empty_string("zone_id", &self.zone_id)?;
        validate_non_empty_string("pushplus_token", &self.pushplus_token)?;
        validate_non_empty_string("line", &self.line)?;
        validate_url("source_url", &self.source_url)?;
        validate_positive_number("max_retries", self.max_retries, 1)?;
        Ok(())
    }
}
