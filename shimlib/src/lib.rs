pub mod coordinator;
pub mod errors;
pub mod guard;
pub mod mounter;
pub mod runner;
pub mod service;
pub mod types;
pub mod verdict;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::JobCoordinator;
pub use errors::{MountError, ServiceError, ShimError};
pub use guard::ReportOnce;
pub use mounter::Mounter;
pub use service::JobService;
pub use types::{CommitMount, JobId, JobTransform, RunStatus};
