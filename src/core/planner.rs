//! Pairing policy between discovered candidate IPs and DNS record slots.
//!
//! Everything here is a pure function of its inputs: strictly positional
//! pairing on both sides, no reordering, no dedup beyond what discovery
//! already guarantees. Record lookup and mutation stay with the caller.

use crate::domain::model::RecordRef;

/// One planned multi-domain assignment: `domains[i]` gets `candidates[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub domain: String,
    pub ip: String,
}

/// One planned single-domain pairing: `records[j]` gets `candidates[j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub record: RecordRef,
    pub ip: String,
}

/// Multi-domain mode: pair each domain with the candidate at the same
/// index. Domains past the end of the candidate list are returned as
/// skipped, so the caller can report them distinctly from failed pairings.
///
/// The index binding happens before anyone looks at the domain's record
/// set: a domain that later turns out to have no records has still
/// consumed its candidate. The next domain never inherits that IP. This
/// wasted-index behavior is kept for compatibility with the original job.
pub fn assign_multi(candidates: &[String], domains: &[String]) -> (Vec<Assignment>, Vec<String>) {
    let n = candidates.len().min(domains.len());
    let assignments = domains[..n]
        .iter()
        .zip(candidates)
        .map(|(domain, ip)| Assignment {
            domain: domain.clone(),
            ip: ip.clone(),
        })
        .collect();
    let skipped = domains[n..].to_vec();
    (assignments, skipped)
}

/// Multi-domain mode updates exactly one record per name: the first in
/// provider order. Siblings sharing the name are left stale on purpose;
/// changing this to a fan-out is a product decision, not a bug fix.
pub fn pick_record(records: &[RecordRef]) -> Option<&RecordRef> {
    records.first()
}

/// Single-domain mode: distribute candidates positionally across the
/// domain's existing records. Excess candidates are dropped unused; excess
/// records are left untouched.
pub fn plan_single(candidates: &[String], records: &[RecordRef]) -> Vec<Pairing> {
    records
        .iter()
        .zip(candidates)
        .map(|(record, ip)| Pairing {
            record: record.clone(),
            ip: ip.clone(),
        })
        .collect()
}
