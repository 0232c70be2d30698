//! Spawns `journalctl --follow` and hands its stdout to the tailer.
//!
//! Extra arguments (unit selection, priority ranges, and so on) come from
//! [`snitch_core::Config::journal_args`], which splits the configured string
//! with shell quoting rules before it reaches this module.

use anyhow::Context;
use std::process::Stdio;
use tokio::process::{Child, ChildStdout};

/// Starts a follower process and returns it together with its piped stdout.
///
/// The child is spawned with `kill_on_drop`, so dropping the handle (for
/// example when the run loop unwinds on error) does not leave a stray
/// `journalctl` behind.
pub fn spawn(extra_args: &[String]) -> anyhow::Result<(Child, ChildStdout)> {
    let mut child = tokio::process::Command::new("journalctl")
        .arg("--follow")
        .args(extra_args)
        .stdout(Stdio::piped())
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .context("failed to spawn journalctl")?;

    let stdout = child
        .stdout
        .take()
        .context("journalctl stdout was not captured")?;

    Ok((child, stdout))
}
