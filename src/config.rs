//! Tunables for the cleanup pipeline.
//!
//! Timing and naming constants travel as an explicit [`CleanupConfig`]
//! value instead of ambient globals, so tests can shorten the delays and
//! point the cgroup root at a scratch directory.

use std::path::PathBuf;
use std::time::Duration;

/// Grace period handed to the engine's stop call.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(20);

/// Pause between SIGTERM and the SIGKILL escalation.
pub const DEFAULT_ESCALATION_DELAY: Duration = Duration::from_secs(2);

/// Per-container helper processes the runtime stack can leave behind.
pub const HELPER_PROCESSES: [&str; 2] = ["containerd-shim", "runc"];

/// containerd namespace the engine creates its tasks in.
pub const DEFAULT_NAMESPACE: &str = "moby";

/// systemd slice the engine places container scope units under.
pub const DEFAULT_CGROUP_ROOT: &str = "/sys/fs/cgroup/system.slice";

#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How long the engine may spend on a graceful stop.
    pub grace_period: Duration,
    /// How long a SIGTERM'd process gets before SIGKILL.
    pub escalation_delay: Duration,
    /// Helper process names matched against host command lines.
    pub helper_processes: Vec<String>,
    /// Task namespace used for every supervisor call.
    pub namespace: String,
    /// Directory the container's cgroup lives under.
    pub cgroup_root: PathBuf,
    /// Unit name of the task supervisor daemon.
    pub supervisor_unit: String,
    /// Unit name of the engine daemon; restarted after the supervisor.
    pub engine_unit: String,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            escalation_delay: DEFAULT_ESCALATION_DELAY,
            helper_processes: HELPER_PROCESSES.map(String::from).to_vec(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            cgroup_root: PathBuf::from(DEFAULT_CGROUP_ROOT),
            supervisor_unit: "containerd".to_string(),
            engine_unit: "docker".to_string(),
        }
    }
}
