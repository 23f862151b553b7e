use protobuf::{job_api_client::JobApiClient, FinishJobRequest, Job, StartJobRequest};
use shimlib::{CommitMount, JobId, JobService, JobTransform, ServiceError};

use async_trait::async_trait;
use tonic::{transport::Channel, Code, Request, Status};

/// Tonic adapter for the job-description service.
pub struct JobApiService {
    inner: JobApiClient<Channel>,
}

impl JobApiService {
    pub async fn connect(addr: &str) -> Result<Self, ServiceError> {
        let inner = JobApiClient::connect(format!("http://{}", addr))
            .await
            .map_err(|err| ServiceError::Unavailable(err.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl JobService for JobApiService {
    async fn start_job(&self, job_id: &JobId) -> Result<JobTransform, ServiceError> {
        let request = Request::new(StartJobRequest {
            job: Some(Job { id: job_id.clone() }),
        });
        // tonic clients take &mut self but are cheap to clone per call
        let response = self
            .inner
            .clone()
            .start_job(request)
            .await
            .map_err(service_error)?
            .into_inner();

        let transform = response.transform.unwrap_or_default();
        Ok(JobTransform {
            cmd: transform.cmd,
            stdin: transform.stdin,
            accept_return_codes: transform.accept_return_code.into_iter().collect(),
            debug: transform.debug,
            mounts: response
                .commit_mounts
                .into_iter()
                .map(|mount| CommitMount {
                    repo: mount.repo,
                    commit: mount.commit,
                    alias: mount.alias,
                })
                .collect(),
        })
    }

    async fn finish_job(&self, job_id: &JobId, success: bool) -> Result<(), ServiceError> {
        let request = Request::new(FinishJobRequest {
            job: Some(Job { id: job_id.clone() }),
            success,
        });
        self.inner
            .clone()
            .finish_job(request)
            .await
            .map_err(service_error)?;
        Ok(())
    }
}

fn service_error(status: Status) -> ServiceError {
    match status.code() {
        Code::Unavailable | Code::DeadlineExceeded => {
            ServiceError::Unavailable(status.to_string())
        }
        _ => ServiceError::Rejected(status.message().to_string()),
    }
}
