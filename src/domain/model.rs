use serde::{Deserialize, Serialize};

/// 域名配置：單一域名，或逗號分隔的多域名列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainSpec {
    Single(String),
    Multi(Vec<String>),
}

impl DomainSpec {
    /// Parses the configured domain string. A comma anywhere selects
    /// multi-domain mode for the whole run; blank input means the spec is
    /// absent. Mode is fixed once parsed.
    pub fn parse(raw: &str) -> Option<DomainSpec> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.contains(',') {
            let names: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if names.is_empty() {
                return None;
            }
            Some(DomainSpec::Multi(names))
        } else {
            Some(DomainSpec::Single(raw.to_string()))
        }
    }
}

/// A DNS record as known to the provider: opaque id plus the owning name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub id: String,
    pub name: String,
}

/// Per-update outcome, accumulated into the run report and rendered into
/// the notification body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated { domain: String, ip: String },
    UpdateFailed { domain: String, ip: String },
    NoRecords { domain: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Updated { .. })
    }

    /// 與原推送文案保持一致，下游通知消費者依賴這個格式
    pub fn render(&self) -> String {
        match self {
            Outcome::Updated { domain, ip } => format!("ip:{}解析{}成功", ip, domain),
            Outcome::UpdateFailed { domain, ip } => format!("ip:{}解析{}失败", ip, domain),
            Outcome::NoRecords { domain } => format!("❌ {}: 未找到DNS记录", domain),
        }
    }
}

/// Why a run stopped before any record was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Discovery exhausted its retries or matched zero rows.
    NoCandidates,
    /// No domain spec configured (detected after discovery, matching the
    /// original's check ordering).
    MissingDomainSpec,
    /// Single-domain mode with an empty record set.
    NoRecords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    PartialFailure,
    Aborted(AbortReason),
}

impl RunStatus {
    /// Exit code for schedulers: 0 fully succeeded, 2 partially succeeded,
    /// 1 aborted before any mutation.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::PartialFailure => 2,
            RunStatus::Aborted(_) => 1,
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub outcomes: Vec<Outcome>,
    /// Multi-domain names that ran out of candidates. Reported distinctly
    /// from failed pairings; never part of the notification.
    pub skipped: Vec<String>,
}

impl RunReport {
    pub fn aborted(reason: AbortReason) -> Self {
        Self {
            status: RunStatus::Aborted(reason),
            outcomes: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_spec_single() {
        assert_eq!(
            DomainSpec::parse("cdn.example.com"),
            Some(DomainSpec::Single("cdn.example.com".to_string()))
        );
    }

    #[test]
    fn test_domain_spec_multi_trims_entries() {
        assert_eq!(
            DomainSpec::parse("a.example.com, b.example.com ,c.example.com"),
            Some(DomainSpec::Multi(vec![
                "a.example.com".to_string(),
                "b.example.com".to_string(),
                "c.example.com".to_string(),
            ]))
        );
    }

    #[test]
    fn test_domain_spec_absent() {
        assert_eq!(DomainSpec::parse(""), None);
        assert_eq!(DomainSpec::parse("   "), None);
        assert_eq!(DomainSpec::parse(" , "), None);
    }

    #[test]
    fn test_outcome_render_matches_legacy_wording() {
        let ok = Outcome::Updated {
            domain: "a.example.com".to_string(),
            ip: "1.1.1.1".to_string(),
        };
        assert_eq!(ok.render(), "ip:1.1.1.1解析a.example.com成功");

        let failed = Outcome::UpdateFailed {
            domain: "a.example.com".to_string(),
            ip: "1.1.1.1".to_string(),
        };
        assert_eq!(failed.render(), "ip:1.1.1.1解析a.example.com失败");

        let missing = Outcome::NoRecords {
            domain: "b.example.com".to_string(),
        };
        assert_eq!(missing.render(), "❌ b.example.com: 未找到DNS记录");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunStatus::Completed.exit_code(), 0);
        assert_eq!(RunStatus::PartialFailure.exit_code(), 2);
        assert_eq!(RunStatus::Aborted(AbortReason::NoCandidates).exit_code(), 1);
    }
}
