pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::JobConfig;
pub use core::job::ReconcileJob;
pub use domain::model::{AbortReason, DomainSpec, Outcome, RecordRef, RunReport, RunStatus};
pub use utils::error::{DnscfError, Result};
