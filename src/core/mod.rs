pub mod job;
pub mod planner;

pub use crate::domain::model::{DomainSpec, Outcome, RecordRef, RunReport, RunStatus};
pub use crate::domain::ports::{DnsProvider, IpSource, Notifier};
pub use crate::utils::error::Result;
