use crate::errors::{MountError, Result, ShimError};
use crate::guard::{self, ReportOnce};
use crate::mounter::Mounter;
use crate::runner;
use crate::service::JobService;
use crate::types::{JobId, JobTransform};
use crate::verdict;

use futures::FutureExt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::oneshot;

pub const DEFAULT_MOUNT_PATH: &str = "/pfs";

/// Drives one job from fetch to completion report.
///
/// Owns the central invariant: the job-description service receives exactly
/// one completion report for every job it hands out, whether the run
/// completes normally, the job turns out to be malformed, or the shim's own
/// logic faults partway through.
pub struct JobCoordinator<S, M> {
    service: Arc<S>,
    mounter: Arc<M>,
    mount_path: String,
}

impl<S: JobService, M: Mounter> JobCoordinator<S, M> {
    pub fn new(service: Arc<S>, mounter: Arc<M>) -> Self {
        Self::with_mount_path(service, mounter, DEFAULT_MOUNT_PATH)
    }

    pub fn with_mount_path(
        service: Arc<S>,
        mounter: Arc<M>,
        mount_path: impl Into<String>,
    ) -> Self {
        Self {
            service,
            mounter,
            mount_path: mount_path.into(),
        }
    }

    /// Run the full lifecycle for `job_id`.
    ///
    /// A fetch error is returned bare: the job was never accepted, so no
    /// completion report is owed. Everything after the fetch runs under the
    /// failure guard.
    pub async fn run(&self, job_id: &JobId) -> Result<()> {
        let transform = self
            .service
            .start_job(job_id)
            .await
            .map_err(ShimError::Fetch)?;
        tracing::debug!(%job_id, cmd = ?transform.cmd, "fetched job transform");

        let finished = ReportOnce::new();
        guard::with_failure_guard(
            self.service.as_ref(),
            job_id,
            &finished,
            self.supervise(job_id, transform, &finished),
        )
        .await
    }

    async fn supervise(
        &self,
        job_id: &JobId,
        transform: JobTransform,
        finished: &ReportOnce,
    ) -> Result<()> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let mount_task = tokio::spawn({
            let mounter = Arc::clone(&self.mounter);
            let path = self.mount_path.clone();
            let mounts = transform.mounts.clone();
            let debug = transform.debug;
            async move { mounter.mount_and_create(&path, mounts, ready_tx, debug).await }
        });

        // one-shot rendezvous: the user command must not start before the
        // data view is usable
        if ready_rx.await.is_err() {
            let err = match mount_task.await {
                Ok(Err(err)) => err,
                Ok(Ok(())) => MountError("mounter returned without signaling readiness".into()),
                Err(join_err) => MountError(join_err.to_string()),
            };
            return Err(ShimError::Mount(err));
        }

        // catch panics here rather than leaving them to the outer guard:
        // teardown must run before a fault unwinds out of this region
        let caught = AssertUnwindSafe(self.execute(job_id, &transform, finished))
            .catch_unwind()
            .await;

        let unmount = self
            .mounter
            .unmount(&self.mount_path)
            .await
            .map_err(ShimError::Unmount);

        let outcome = match caught {
            Ok(outcome) => outcome,
            Err(fault) => {
                // the fault takes precedence; still surface teardown
                // trouble to the operator before resuming it
                if let Err(err) = &unmount {
                    eprintln!("{}", err);
                }
                panic::resume_unwind(fault)
            }
        };

        // a serving mounter can fail after signaling readiness; that was a
        // mount failure all along and is just as fatal
        let serve = match mount_task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(ShimError::Mount(err)),
            Err(join_err) => Err(ShimError::Mount(MountError(join_err.to_string()))),
        };

        // whichever error wins, the ones it masks still reach stderr
        if outcome.is_err() {
            if let Err(err) = &serve {
                eprintln!("{}", err);
            }
        }
        if outcome.is_err() || serve.is_err() {
            if let Err(err) = &unmount {
                eprintln!("{}", err);
            }
        }
        outcome.and(serve).and(unmount)
    }

    async fn execute(
        &self,
        job_id: &JobId,
        transform: &JobTransform,
        finished: &ReportOnce,
    ) -> Result<()> {
        if transform.cmd.is_empty() {
            // malformed job, not an infrastructure failure
            eprintln!("unable to run; a cmd needs to be provided");
            return self.report(job_id, false, finished).await;
        }

        let status = runner::run(&transform.cmd, &transform.stdin).await;
        let success = verdict::classify(&status, &transform.accept_return_codes);
        if !success {
            match &status {
                Ok(run_status) => eprintln!("Error from exec: {:?}", run_status),
                Err(err) => eprintln!("Error from exec: {}", err),
            }
        }
        self.report(job_id, success, finished).await
    }

    async fn report(&self, job_id: &JobId, success: bool, finished: &ReportOnce) -> Result<()> {
        if finished.is_claimed() {
            return Ok(());
        }
        self.service
            .finish_job(job_id, success)
            .await
            .map_err(ShimError::Report)?;
        // claimed only once the send went through, so a fault mid-send
        // still leaves the failure guard responsible for the report
        finished.try_claim();
        Ok(())
    }
}
