use shimlib::{CommitMount, MountError, Mounter};

use async_trait::async_trait;
use std::process::Stdio;
use tokio::{process::Command, sync::oneshot};

/// Adapter over the external mount helper program. The helper's `mount`
/// command exits 0 once the data view under the mount point is usable;
/// `unmount` tears it down.
pub struct HelperMounter {
    helper: String,
}

impl HelperMounter {
    pub fn new(helper: impl Into<String>) -> Self {
        Self {
            helper: helper.into(),
        }
    }

    async fn run_helper(&self, args: &[String]) -> Result<(), MountError> {
        let status = Command::new(&self.helper)
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| MountError(format!("{}: {}", self.helper, err)))?;
        if status.success() {
            Ok(())
        } else {
            Err(MountError(format!("{} exited with {}", self.helper, status)))
        }
    }
}

#[async_trait]
impl Mounter for HelperMounter {
    async fn mount_and_create(
        &self,
        path: &str,
        mounts: Vec<CommitMount>,
        ready: oneshot::Sender<()>,
        debug: bool,
    ) -> Result<(), MountError> {
        let mut args = vec!["mount".to_string(), path.to_string()];
        for mount in &mounts {
            args.push("--commit".to_string());
            args.push(format!("{}@{}:{}", mount.repo, mount.commit, mount.alias));
        }
        if debug {
            args.push("--debug".to_string());
        }
        self.run_helper(&args).await?;
        // the view is usable once the helper exits cleanly
        let _ = ready.send(());
        Ok(())
    }

    async fn unmount(&self, path: &str) -> Result<(), MountError> {
        self.run_helper(&["unmount".to_string(), path.to_string()])
            .await
    }
}
