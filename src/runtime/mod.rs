//! Seams to the host runtime stack.
//!
//! Every collaborator the pipeline touches (the container engine, the
//! containerd task supervisor, systemd, and raw host processes) sits
//! behind a small trait. The production implementations drive the
//! collaborator CLIs; tests drive the same pipeline against recording
//! doubles. Process discovery is deliberately a predicate over command
//! lines so the `/proc` walk can be swapped for a cgroup walk without
//! touching the escalation logic.

pub mod ctr;
pub mod docker;
pub mod host;
pub mod systemctl;

use std::io;
use std::process::{Command, ExitStatus, Output};
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

/// One row of the engine's container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: &'static str,
        status: ExitStatus,
        stderr: String,
    },
    #[error("unexpected {command} output: {source}")]
    Payload {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Proc(#[from] procfs::ProcError),
}

/// Lifecycle surface of the container engine.
pub trait ContainerEngine {
    /// ID of the container whose name equals `name` exactly, if any.
    fn resolve_name(&self, name: &str) -> Result<Option<String>, RuntimeError>;

    /// All containers, running or not, in the engine's natural order.
    fn list(&self) -> Result<Vec<ContainerSummary>, RuntimeError>;

    /// PID of the container's init process. Zero or negative means the
    /// container has no live process.
    fn main_pid(&self, id: &str) -> Result<i32, RuntimeError>;

    /// Ask the engine to stop the container within `grace`. The returned
    /// bool is the engine's own verdict.
    fn stop(&self, id: &str, grace: Duration) -> Result<bool, RuntimeError>;

    /// Remove the container record even if it is still running.
    fn force_remove(&self, id: &str) -> Result<(), RuntimeError>;
}

/// Task surface of the low-level supervisor.
pub trait TaskSupervisor {
    /// Whether the supervisor CLI is present on this host at all.
    fn available(&self) -> bool;

    /// Raw task listing for `namespace`.
    fn list_tasks(&self, namespace: &str) -> Result<String, RuntimeError>;

    fn kill_task(&self, namespace: &str, id: &str, signal: Signal) -> Result<(), RuntimeError>;

    fn delete_task(&self, namespace: &str, id: &str) -> Result<(), RuntimeError>;

    fn delete_container(&self, namespace: &str, id: &str) -> Result<(), RuntimeError>;
}

/// Unit control surface of the init system.
pub trait ServiceManager {
    fn stop_unit(&self, unit: &str) -> Result<(), RuntimeError>;

    fn reset_failed(&self, unit: &str) -> Result<(), RuntimeError>;

    fn daemon_reexec(&self) -> Result<(), RuntimeError>;

    fn restart_unit(&self, unit: &str) -> Result<(), RuntimeError>;
}

/// Raw process control on the host.
pub trait ProcessHost {
    /// Send `signal` to `pid`.
    fn kill(&self, pid: Pid, signal: Signal) -> Result<(), Errno>;

    /// Whether `pid` is still alive.
    fn alive(&self, pid: Pid) -> bool;

    /// PIDs of host processes whose command line satisfies `predicate`.
    fn find_processes(&self, predicate: &dyn Fn(&str) -> bool) -> Result<Vec<Pid>, RuntimeError>;
}

pub(crate) fn output(command: &'static str, args: &[&str]) -> Result<Output, RuntimeError> {
    Command::new(command)
        .args(args)
        .output()
        .map_err(|source| RuntimeError::Spawn { command, source })
}

/// Run `command` and return its trimmed stdout, failing on non-zero exit.
pub(crate) fn checked_stdout(command: &'static str, args: &[&str]) -> Result<String, RuntimeError> {
    let output = output(command, args)?;
    if !output.status.success() {
        return Err(RuntimeError::CommandFailed {
            command,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run `command` for its exit status only, discarding its output.
pub(crate) fn checked_status(command: &'static str, args: &[&str]) -> Result<(), RuntimeError> {
    let output = output(command, args)?;
    if !output.status.success() {
        return Err(RuntimeError::CommandFailed {
            command,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
