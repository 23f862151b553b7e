use crate::errors::{Result, ShimError};
use crate::service::JobService;
use crate::types::JobId;

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-writer-wins flag guarding the completion report. Whichever path
/// claims it first (normal completion or the failure guard) is the only
/// one allowed to send.
#[derive(Debug, Default)]
pub struct ReportOnce(AtomicBool);

impl ReportOnce {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Returns true exactly once, for the first caller.
    pub fn try_claim(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_claimed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run `fut` with a crash-safety net: if it panics and no completion
/// report has gone out yet, send a best-effort failure report before
/// surfacing the fault. A report that cannot be delivered here is fatal;
/// there is no further fallback.
pub async fn with_failure_guard<S, F, T>(
    service: &S,
    job_id: &JobId,
    finished: &ReportOnce,
    fut: F,
) -> Result<T>
where
    S: JobService,
    F: Future<Output = Result<T>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic_message(panic);
            tracing::error!(%job_id, %reason, "job shim crashed");
            if !finished.is_claimed() {
                service
                    .finish_job(job_id, false)
                    .await
                    .map_err(ShimError::Report)?;
                finished.try_claim();
            }
            Err(ShimError::Fault(reason))
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{event_log, FakeMounter, FakeService};
    use crate::types::JobTransform;

    #[tokio::test]
    async fn report_once_claims_exactly_once() {
        let once = ReportOnce::new();
        assert!(!once.is_claimed());
        assert!(once.try_claim());
        assert!(!once.try_claim());
        assert!(once.is_claimed());
    }

    #[tokio::test]
    async fn passes_through_a_clean_result() {
        let events = event_log();
        let service = FakeService::new(JobTransform::default(), events);
        let finished = ReportOnce::new();
        let job_id = "job-1".to_string();

        let value = with_failure_guard(&service, &job_id, &finished, async { Ok(42) })
            .await
            .expect("guard err");
        assert_eq!(value, 42);
        assert!(service.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fault_before_mount_sends_one_failure_report() {
        let events = event_log();
        let service = FakeService::new(JobTransform::default(), events.clone());
        let _mounter = FakeMounter::new(events.clone());
        let finished = ReportOnce::new();
        let job_id = "job-1".to_string();

        let result: Result<()> =
            with_failure_guard(&service, &job_id, &finished, async { panic!("boom") }).await;

        assert!(matches!(result, Err(ShimError::Fault(_))));
        assert_eq!(
            *service.reports.lock().unwrap(),
            vec![("job-1".to_string(), false)]
        );
        // the mounter was never touched
        assert_eq!(*events.lock().unwrap(), vec!["report".to_string()]);
    }

    #[tokio::test]
    async fn fault_after_report_sends_nothing_more() {
        let events = event_log();
        let service = FakeService::new(JobTransform::default(), events);
        let finished = ReportOnce::new();
        assert!(finished.try_claim());
        let job_id = "job-1".to_string();

        let result: Result<()> =
            with_failure_guard(&service, &job_id, &finished, async { panic!("boom") }).await;

        assert!(matches!(result, Err(ShimError::Fault(_))));
        assert!(service.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn undeliverable_guard_report_is_fatal() {
        let events = event_log();
        let mut service = FakeService::new(JobTransform::default(), events);
        service.fail_finish = true;
        let finished = ReportOnce::new();
        let job_id = "job-1".to_string();

        let result: Result<()> =
            with_failure_guard(&service, &job_id, &finished, async { panic!("boom") }).await;

        assert!(matches!(result, Err(ShimError::Report(_))));
    }
}
