//! Supervision of the long-running iostat child process.
//!
//! iostat is spawned once with piped stdout and produces one report per
//! sampling interval forever. The supervisor owns the child handle, hands
//! out its stdout as buffered lines, and terminates the child on request so
//! a collectd restart never leaves an orphaned iostat behind.

use std::process::{ExitStatus, Stdio};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{info, warn};

use crate::error::{RelayError, Result};

/// A supervised iostat child process.
#[derive(Debug)]
pub struct IostatProcess {
    child: Child,
}

impl IostatProcess {
    /// Spawn `iostat` with the given option string and sampling delay.
    ///
    /// The option string is normalized to a single leading dash regardless
    /// of how the user wrote it (`Nxk`, `-Nxk`, `Nxk-` all become `-Nxk`).
    pub fn spawn(options: &str, delay_secs: u64) -> Result<Self> {
        let flags = format!("-{}", options.trim_matches('-'));
        Self::spawn_program("iostat", &[&flags, &delay_secs.to_string()])
    }

    /// Spawn an arbitrary sampling program with piped stdout.
    pub fn spawn_program(program: &str, args: &[&str]) -> Result<Self> {
        let child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                RelayError::subprocess_error(format!("failed to spawn {}: {}", program, e))
            })?;

        info!(
            "spawned {} {} (pid={})",
            program,
            args.join(" "),
            child.id().unwrap_or(0)
        );
        Ok(Self { child })
    }

    /// Take the child's stdout as a stream of lines.
    ///
    /// Can only be called once; the stream ends when the child exits.
    pub fn lines(&mut self) -> Result<Lines<BufReader<ChildStdout>>> {
        let stdout = self
            .child
            .stdout
            .take()
            .ok_or_else(|| RelayError::subprocess_error("child stdout already taken"))?;
        Ok(BufReader::new(stdout).lines())
    }

    /// Send SIGTERM to the child. Idempotent: repeated calls, or calls after
    /// the child already exited, are no-ops.
    pub fn terminate(&self) {
        match self.child.id() {
            Some(pid) => {
                if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                    warn!("failed to send SIGTERM to pid {}: {}", pid, e);
                }
            }
            None => info!("child already exited, nothing to terminate"),
        }
    }

    /// Wait for the child to exit and reap it.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait().await?;
        info!("child exited with {}", status);
        Ok(status)
    }
}
