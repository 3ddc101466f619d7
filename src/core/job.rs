//! Run-to-completion engine: discover, plan, apply, notify. Strictly
//! sequential; one invocation per external schedule, no state across runs.

use crate::core::planner;
use crate::domain::model::{AbortReason, DomainSpec, Outcome, RunReport, RunStatus};
use crate::domain::ports::{DnsProvider, IpSource, Notifier};

pub struct ReconcileJob<S: IpSource, P: DnsProvider, N: Notifier> {
    source: S,
    provider: P,
    notifier: N,
    domain_spec: Option<DomainSpec>,
}

impl<S: IpSource, P: DnsProvider, N: Notifier> ReconcileJob<S, P, N> {
    pub fn new(source: S, provider: P, notifier: N, domain_spec: Option<DomainSpec>) -> Self {
        Self {
            source,
            provider,
            notifier,
            domain_spec,
        }
    }

    pub async fn run(&self) -> RunReport {
        // 獲取優選IP
        tracing::info!("fetching candidate IPs...");
        let candidates = match self.source.fetch_candidates().await {
            Ok(list) => list,
            Err(e) => {
                tracing::error!("candidate discovery failed: {}", e);
                Vec::new()
            }
        };

        if candidates.is_empty() {
            tracing::error!("no candidate IPs discovered, aborting before any DNS change");
            return RunReport::aborted(AbortReason::NoCandidates);
        }
        tracing::info!(
            "discovered {} candidate IPs: {:?}",
            candidates.len(),
            &candidates[..candidates.len().min(5)]
        );

        // 域名配置在發現之後才檢查，與原腳本的順序一致
        let spec = match &self.domain_spec {
            Some(spec) => spec,
            None => {
                tracing::error!("no domain spec configured");
                return RunReport::aborted(AbortReason::MissingDomainSpec);
            }
        };

        match spec {
            DomainSpec::Multi(domains) => self.run_multi(&candidates, domains).await,
            DomainSpec::Single(domain) => self.run_single(&candidates, domain).await,
        }
    }

    /// Multi-domain mode: one candidate per domain by position, first
    /// record per domain.
    async fn run_multi(&self, candidates: &[String], domains: &[String]) -> RunReport {
        tracing::info!("multi-domain mode: {} domains", domains.len());
        if candidates.len() < domains.len() {
            tracing::warn!(
                "candidate IPs ({}) fewer than domains ({})",
                candidates.len(),
                domains.len()
            );
        }

        let (assignments, skipped) = planner::assign_multi(candidates, domains);
        let mut outcomes = Vec::new();

        for assignment in &assignments {
            tracing::info!("processing domain: {}", assignment.domain);
            // 查詢失敗視同無記錄，與原腳本行為一致
            let records = match self.provider.list_records(&assignment.domain).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!("record lookup failed for {}: {}", assignment.domain, e);
                    Vec::new()
                }
            };

            match planner::pick_record(&records) {
                Some(record) => {
                    let outcome = match self.provider.update_record(record, &assignment.ip).await {
                        Ok(()) => Outcome::Updated {
                            domain: assignment.domain.clone(),
                            ip: assignment.ip.clone(),
                        },
                        Err(e) => {
                            tracing::error!(
                                "update failed for {} -> {}: {}",
                                assignment.domain,
                                assignment.ip,
                                e
                            );
                            Outcome::UpdateFailed {
                                domain: assignment.domain.clone(),
                                ip: assignment.ip.clone(),
                            }
                        }
                    };
                    outcomes.push(outcome);
                }
                None => {
                    tracing::warn!("no DNS records found for {}", assignment.domain);
                    outcomes.push(Outcome::NoRecords {
                        domain: assignment.domain.clone(),
                    });
                }
            }
        }

        for domain in &skipped {
            tracing::info!("skipping domain {}: no candidate IP left", domain);
        }

        self.finish(outcomes, skipped).await
    }

    /// Single-domain mode: candidates distributed positionally across the
    /// domain's existing records.
    async fn run_single(&self, candidates: &[String], domain: &str) -> RunReport {
        tracing::info!("single-domain mode: {}", domain);

        let records = match self.provider.list_records(domain).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("record lookup failed for {}: {}", domain, e);
                return RunReport::aborted(AbortReason::NoRecords);
            }
        };
        if records.is_empty() {
            tracing::error!("no DNS records found for {}", domain);
            return RunReport::aborted(AbortReason::NoRecords);
        }

        let mut outcomes = Vec::new();
        for pairing in planner::plan_single(candidates, &records) {
            let outcome = match self.provider.update_record(&pairing.record, &pairing.ip).await {
                Ok(()) => Outcome::Updated {
                    domain: domain.to_string(),
                    ip: pairing.ip.clone(),
                },
                Err(e) => {
                    tracing::error!("update failed for {} -> {}: {}", domain, pairing.ip, e);
                    Outcome::UpdateFailed {
                        domain: domain.to_string(),
                        ip: pairing.ip.clone(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        self.finish(outcomes, Vec::new()).await
    }

    async fn finish(&self, outcomes: Vec<Outcome>, skipped: Vec<String>) -> RunReport {
        if outcomes.is_empty() {
            tracing::info!("nothing to report, skipping notification");
        } else {
            let lines: Vec<String> = outcomes.iter().map(Outcome::render).collect();
            // 推送失敗不影響本次運行結果
            if let Err(e) = self.notifier.notify(&lines).await {
                tracing::warn!("notification delivery failed: {}", e);
            }
        }

        let status = if outcomes.iter().all(Outcome::is_success) {
            RunStatus::Completed
        } else {
            RunStatus::PartialFailure
        };

        RunReport {
            status,
            outcomes,
            skipped,
        }
    }
}
