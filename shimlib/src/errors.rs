use std::result;
use thiserror::Error;

/// Failure talking to the job-description service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Transport-level failure; the service never answered.
    #[error("job service unavailable: {0}")]
    Unavailable(String),
    /// The service answered but refused the call.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct MountError(pub String);

/// Everything that can go wrong inside the shim itself. A failed user
/// process is not in here: that is a normal outcome carried by the
/// completion report.
#[derive(Error, Debug)]
pub enum ShimError {
    #[error("fetching job spec: {0}")]
    Fetch(#[source] ServiceError),
    #[error("mounting environment: {0}")]
    Mount(#[source] MountError),
    #[error("unmounting environment: {0}")]
    Unmount(#[source] MountError),
    #[error("sending completion report: {0}")]
    Report(#[source] ServiceError),
    #[error("job shim crashed: {0}")]
    Fault(String),
}

pub type Result<T> = result::Result<T, ShimError>;
