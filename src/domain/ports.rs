use crate::domain::model::RecordRef;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of candidate IPs, ordered by the source's preference ranking.
///
/// Implementations retry internally and absorb provider anomalies:
/// exhaustion yields `Ok` with an empty list, never an error.
#[async_trait]
pub trait IpSource: Send + Sync {
    async fn fetch_candidates(&self) -> Result<Vec<String>>;
}

/// DNS provider operations this job needs. There is deliberately no
/// create path; a name with zero existing records is never auto-created.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Existing records for `name`, in provider order.
    async fn list_records(&self, name: &str) -> Result<Vec<RecordRef>>;

    /// Points `record` at `ip` as an address record.
    async fn update_record(&self, record: &RecordRef, ip: &str) -> Result<()>;
}

/// Delivers the aggregated run report. Callers treat delivery as
/// best-effort.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, lines: &[String]) -> Result<()>;
}
