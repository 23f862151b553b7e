use crate::types::RunStatus;

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::Stdio;
use tokio::{io::AsyncWriteExt, process::Command};

/// Launch the user command and wait for it to terminate.
///
/// stdout and stderr are inherited so the job's output streams straight
/// through the shim to whatever is watching it. `stdin_lines` are fed to
/// the child in order, each newline-terminated, then the pipe is closed.
/// An `Err` means the process never launched.
///
/// Caller-enforced precondition: `cmd` is non-empty.
pub async fn run(cmd: &[String], stdin_lines: &[String]) -> io::Result<RunStatus> {
    let mut child = Command::new(&cmd[0])
        .args(&cmd[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        let lines = stdin_lines.to_vec();
        // feed stdin from its own task so a child that never reads it
        // cannot deadlock the wait below
        tokio::spawn(async move {
            for line in &lines {
                if stdin.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
                if stdin.write_all(b"\n").await.is_err() {
                    break;
                }
            }
            // dropping stdin closes the pipe
        });
    }

    let exit_status = child.wait().await?;
    if let Some(code) = exit_status.code() {
        Ok(RunStatus::Exited { code })
    } else if let Some(signal) = exit_status.signal() {
        Ok(RunStatus::Killed { signal })
    } else {
        unreachable!()
    }
}
