use crate::errors::ServiceError;
use crate::types::{JobId, JobTransform};

use async_trait::async_trait;

/// The job-description service, as seen by the shim: one fetch, one
/// completion report.
#[async_trait]
pub trait JobService: Send + Sync + 'static {
    /// Accept the job and hand back its transform.
    async fn start_job(&self, job_id: &JobId) -> Result<JobTransform, ServiceError>;

    /// Deliver the completion report. The coordinator guarantees this is
    /// called at most once per run.
    async fn finish_job(&self, job_id: &JobId, success: bool) -> Result<(), ServiceError>;
}
