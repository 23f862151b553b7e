//! Test doubles for the consumed interfaces, shared across test modules.

use crate::errors::{MountError, ServiceError};
use crate::mounter::Mounter;
use crate::service::JobService;
use crate::types::{CommitMount, JobId, JobTransform};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn transform_for(cmd: &[&str]) -> JobTransform {
    JobTransform {
        cmd: cmd.iter().map(|s| s.to_string()).collect(),
        ..JobTransform::default()
    }
}

pub struct FakeService {
    pub transform: JobTransform,
    pub fail_start: bool,
    pub fail_finish: bool,
    /// Panic on the first finish call only, so a retry can get through.
    pub panic_first_finish: bool,
    panicked: AtomicBool,
    pub reports: Mutex<Vec<(JobId, bool)>>,
    pub events: EventLog,
}

impl FakeService {
    pub fn new(transform: JobTransform, events: EventLog) -> Self {
        Self {
            transform,
            fail_start: false,
            fail_finish: false,
            panic_first_finish: false,
            panicked: AtomicBool::new(false),
            reports: Mutex::new(Vec::new()),
            events,
        }
    }
}

#[async_trait]
impl JobService for FakeService {
    async fn start_job(&self, _job_id: &JobId) -> Result<JobTransform, ServiceError> {
        if self.fail_start {
            return Err(ServiceError::Rejected("job not found".into()));
        }
        Ok(self.transform.clone())
    }

    async fn finish_job(&self, job_id: &JobId, success: bool) -> Result<(), ServiceError> {
        if self.panic_first_finish && !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("transform processing went sideways");
        }
        if self.fail_finish {
            return Err(ServiceError::Unavailable("connection refused".into()));
        }
        self.reports.lock().unwrap().push((job_id.clone(), success));
        self.events.lock().unwrap().push("report".into());
        Ok(())
    }
}

pub struct FakeMounter {
    pub ready_delay: Duration,
    pub fail_mount: bool,
    /// Signal readiness, then fail like a serve loop dying mid-run.
    pub fail_after_ready: bool,
    pub fail_unmount: bool,
    pub events: EventLog,
}

impl FakeMounter {
    pub fn new(events: EventLog) -> Self {
        Self {
            ready_delay: Duration::ZERO,
            fail_mount: false,
            fail_after_ready: false,
            fail_unmount: false,
            events,
        }
    }
}

#[async_trait]
impl Mounter for FakeMounter {
    async fn mount_and_create(
        &self,
        _path: &str,
        _mounts: Vec<CommitMount>,
        ready: oneshot::Sender<()>,
        _debug: bool,
    ) -> Result<(), MountError> {
        if self.fail_mount {
            return Err(MountError("fuse init failed".into()));
        }
        if !self.ready_delay.is_zero() {
            tokio::time::sleep(self.ready_delay).await;
        }
        self.events.lock().unwrap().push("ready".into());
        let _ = ready.send(());
        if self.fail_after_ready {
            return Err(MountError("fuse serve loop died".into()));
        }
        Ok(())
    }

    async fn unmount(&self, _path: &str) -> Result<(), MountError> {
        self.events.lock().unwrap().push("unmount".into());
        if self.fail_unmount {
            return Err(MountError("target is busy".into()));
        }
        Ok(())
    }
}
