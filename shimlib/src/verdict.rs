use crate::types::RunStatus;

use std::collections::HashSet;
use std::io;

/// Map a raw termination status to a success verdict.
///
/// Exit 0 always succeeds. A non-zero code succeeds only if it appears in
/// `accept` (a documented "partial success" code). A launch failure or a
/// signal death never succeeds, whatever the accept set says.
pub fn classify(status: &io::Result<RunStatus>, accept: &HashSet<i32>) -> bool {
    match status {
        Ok(RunStatus::Exited { code: 0 }) => true,
        Ok(RunStatus::Exited { code }) => accept.contains(code),
        Ok(RunStatus::Killed { .. }) => false,
        Err(_) => false,
    }
}
