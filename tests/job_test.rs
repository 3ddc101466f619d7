//! End-to-end job runs over in-memory collaborator fakes.

use async_trait::async_trait;
use dnscf::domain::ports::{DnsProvider, IpSource, Notifier};
use dnscf::utils::error::{DnscfError, Result};
use dnscf::{AbortReason, DomainSpec, Outcome, RecordRef, ReconcileJob, RunStatus};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

struct FakeSource {
    candidates: Vec<String>,
}

#[async_trait]
impl IpSource for FakeSource {
    async fn fetch_candidates(&self) -> Result<Vec<String>> {
        Ok(self.candidates.clone())
    }
}

#[derive(Clone)]
struct FakeProvider {
    records: HashMap<String, Vec<RecordRef>>,
    failing_lookups: HashSet<String>,
    failing_updates: HashSet<String>,
    lookups: Arc<Mutex<Vec<String>>>,
    updates: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeProvider {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
            failing_lookups: HashSet::new(),
            failing_updates: HashSet::new(),
            lookups: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_records(mut self, name: &str, ids: &[&str]) -> Self {
        let refs = ids
            .iter()
            .map(|id| RecordRef {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        self.records.insert(name.to_string(), refs);
        self
    }

    fn fail_lookup(mut self, name: &str) -> Self {
        self.failing_lookups.insert(name.to_string());
        self
    }

    fn fail_update(mut self, record_id: &str) -> Self {
        self.failing_updates.insert(record_id.to_string());
        self
    }

    async fn lookups(&self) -> Vec<String> {
        self.lookups.lock().await.clone()
    }

    async fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().await.clone()
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    async fn list_records(&self, name: &str) -> Result<Vec<RecordRef>> {
        self.lookups.lock().await.push(name.to_string());
        if self.failing_lookups.contains(name) {
            return Err(DnscfError::ProviderError {
                message: "lookup failed".to_string(),
            });
        }
        Ok(self.records.get(name).cloned().unwrap_or_default())
    }

    async fn update_record(&self, record: &RecordRef, ip: &str) -> Result<()> {
        if self.failing_updates.contains(&record.id) {
            return Err(DnscfError::ProviderError {
                message: "update failed".to_string(),
            });
        }
        self.updates
            .lock()
            .await
            .push((record.id.clone(), ip.to_string()));
        Ok(())
    }
}

#[derive(Clone)]
struct FakeNotifier {
    failing: bool,
    sent: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeNotifier {
    fn new() -> Self {
        Self {
            failing: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing() -> Self {
        Self {
            failing: true,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn sent(&self) -> Vec<Vec<String>> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, lines: &[String]) -> Result<()> {
        if self.failing {
            return Err(DnscfError::ProviderError {
                message: "push down".to_string(),
            });
        }
        self.sent.lock().await.push(lines.to_vec());
        Ok(())
    }
}

fn candidates(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_empty_candidates_short_circuit() {
    let provider = FakeProvider::new().with_records("a.example.com", &["r1"]);
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource { candidates: vec![] },
        provider.clone(),
        notifier.clone(),
        DomainSpec::parse("a.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::Aborted(AbortReason::NoCandidates));
    assert!(provider.lookups().await.is_empty());
    assert!(provider.updates().await.is_empty());
    assert!(notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_missing_domain_spec_aborts_after_discovery() {
    let provider = FakeProvider::new();
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1"]),
        },
        provider.clone(),
        notifier.clone(),
        None,
    );

    let report = job.run().await;

    assert_eq!(
        report.status,
        RunStatus::Aborted(AbortReason::MissingDomainSpec)
    );
    assert!(provider.lookups().await.is_empty());
    assert!(notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_multi_domain_spec_example() {
    // candidates=[1.1.1.1, 2.2.2.2], domains=[a, b, c] -> a and b updated,
    // c skipped without a lookup.
    let provider = FakeProvider::new()
        .with_records("a.example.com", &["a1", "a2"])
        .with_records("b.example.com", &["b1"])
        .with_records("c.example.com", &["c1"]);
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1", "2.2.2.2"]),
        },
        provider.clone(),
        notifier.clone(),
        DomainSpec::parse("a.example.com,b.example.com,c.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(
        provider.updates().await,
        vec![
            ("a1".to_string(), "1.1.1.1".to_string()),
            ("b1".to_string(), "2.2.2.2".to_string()),
        ]
    );
    assert_eq!(
        provider.lookups().await,
        vec!["a.example.com".to_string(), "b.example.com".to_string()]
    );
    assert_eq!(report.skipped, vec!["c.example.com".to_string()]);
    assert_eq!(report.outcomes.len(), 2);

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        vec![
            "ip:1.1.1.1解析a.example.com成功".to_string(),
            "ip:2.2.2.2解析b.example.com成功".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_multi_domain_no_records_wastes_candidate_index() {
    // a.example.com has no records; its candidate is consumed anyway and
    // b.example.com still receives candidates[1].
    let provider = FakeProvider::new().with_records("b.example.com", &["b1"]);
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1", "2.2.2.2"]),
        },
        provider.clone(),
        notifier.clone(),
        DomainSpec::parse("a.example.com,b.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::PartialFailure);
    assert_eq!(
        provider.updates().await,
        vec![("b1".to_string(), "2.2.2.2".to_string())]
    );
    assert_eq!(
        report.outcomes[0],
        Outcome::NoRecords {
            domain: "a.example.com".to_string()
        }
    );

    let sent = notifier.sent().await;
    assert_eq!(sent[0][0], "❌ a.example.com: 未找到DNS记录");
}

#[tokio::test]
async fn test_multi_domain_lookup_failure_treated_as_no_records() {
    let provider =
        FakeProvider::new().with_records("b.example.com", &["b1"]).fail_lookup("a.example.com");
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1", "2.2.2.2"]),
        },
        provider.clone(),
        notifier.clone(),
        DomainSpec::parse("a.example.com,b.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::PartialFailure);
    assert_eq!(
        report.outcomes[0],
        Outcome::NoRecords {
            domain: "a.example.com".to_string()
        }
    );
    assert_eq!(
        provider.updates().await,
        vec![("b1".to_string(), "2.2.2.2".to_string())]
    );
}

#[tokio::test]
async fn test_multi_domain_update_failure_does_not_abort_siblings() {
    let provider = FakeProvider::new()
        .with_records("a.example.com", &["a1"])
        .with_records("b.example.com", &["b1"])
        .fail_update("a1");
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1", "2.2.2.2"]),
        },
        provider.clone(),
        notifier.clone(),
        DomainSpec::parse("a.example.com,b.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::PartialFailure);
    assert_eq!(
        report.outcomes,
        vec![
            Outcome::UpdateFailed {
                domain: "a.example.com".to_string(),
                ip: "1.1.1.1".to_string()
            },
            Outcome::Updated {
                domain: "b.example.com".to_string(),
                ip: "2.2.2.2".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_single_domain_spec_example() {
    // candidates=[1.1.1.1, 2.2.2.2, 3.3.3.3], records=[r1, r2] ->
    // r1 and r2 updated positionally, 3.3.3.3 unused.
    let provider = FakeProvider::new().with_records("x.example.com", &["r1", "r2"]);
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1", "2.2.2.2", "3.3.3.3"]),
        },
        provider.clone(),
        notifier.clone(),
        DomainSpec::parse("x.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(
        provider.updates().await,
        vec![
            ("r1".to_string(), "1.1.1.1".to_string()),
            ("r2".to_string(), "2.2.2.2".to_string()),
        ]
    );
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn test_single_domain_excess_records_left_untouched() {
    let provider = FakeProvider::new().with_records("x.example.com", &["r1", "r2", "r3"]);
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1"]),
        },
        provider.clone(),
        notifier.clone(),
        DomainSpec::parse("x.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(
        provider.updates().await,
        vec![("r1".to_string(), "1.1.1.1".to_string())]
    );
}

#[tokio::test]
async fn test_single_domain_no_records_aborts_without_notification() {
    let provider = FakeProvider::new();
    let notifier = FakeNotifier::new();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1"]),
        },
        provider.clone(),
        notifier.clone(),
        DomainSpec::parse("x.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::Aborted(AbortReason::NoRecords));
    assert!(report.outcomes.is_empty());
    assert!(provider.updates().await.is_empty());
    assert!(notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_notification_failure_does_not_change_run_status() {
    let provider = FakeProvider::new().with_records("x.example.com", &["r1"]);
    let notifier = FakeNotifier::failing();
    let job = ReconcileJob::new(
        FakeSource {
            candidates: candidates(&["1.1.1.1"]),
        },
        provider.clone(),
        notifier,
        DomainSpec::parse("x.example.com"),
    );

    let report = job.run().await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.outcomes.len(), 1);
}
