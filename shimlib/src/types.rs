use std::collections::HashSet;

pub type JobId = String;
pub type Cmd = Vec<String>;
pub type StdinLines = Vec<String>;

/// The work specification fetched from the job-description service.
/// Immutable once fetched; owned by the coordinator for one run.
#[derive(Clone, Debug, Default)]
pub struct JobTransform {
    pub cmd: Cmd,
    pub stdin: StdinLines,
    pub accept_return_codes: HashSet<i32>,
    pub debug: bool,
    pub mounts: Vec<CommitMount>,
}

/// Binds one dataset version to a path under the mount point. Opaque to
/// the coordinator; handed to the mounter unmodified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitMount {
    pub repo: String,
    pub commit: String,
    pub alias: String,
}

/// Raw termination status of the user process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Exited { code: i32 },
    Killed { signal: i32 },
}
