use crate::errors::MountError;
use crate::types::CommitMount;

use async_trait::async_trait;
use tokio::sync::oneshot;

/// The data-mounting subsystem, as seen by the shim.
#[async_trait]
pub trait Mounter: Send + Sync + 'static {
    /// Establish the filesystem view under `path` and fire `ready` once the
    /// view is usable. May keep serving until `unmount` is called.
    async fn mount_and_create(
        &self,
        path: &str,
        mounts: Vec<CommitMount>,
        ready: oneshot::Sender<()>,
        debug: bool,
    ) -> Result<(), MountError>;

    async fn unmount(&self, path: &str) -> Result<(), MountError>;
}
