//! Task supervisor reached through the `ctr` binary.

use std::path::PathBuf;

use nix::sys::signal::Signal;

use super::{checked_status, checked_stdout, RuntimeError, TaskSupervisor};

const CTR: &str = "ctr";

#[derive(Debug, Default)]
pub struct CtrCli;

impl TaskSupervisor for CtrCli {
    fn available(&self) -> bool {
        let path = match std::env::var_os("PATH") {
            Some(path) => path,
            None => return false,
        };
        std::env::split_paths(&path)
            .map(|dir| dir.join(CTR))
            .any(|candidate: PathBuf| candidate.is_file())
    }

    fn list_tasks(&self, namespace: &str) -> Result<String, RuntimeError> {
        checked_stdout(CTR, &["-n", namespace, "tasks", "ls"])
    }

    fn kill_task(&self, namespace: &str, id: &str, signal: Signal) -> Result<(), RuntimeError> {
        checked_status(
            CTR,
            &[
                "-n",
                namespace,
                "tasks",
                "kill",
                "--signal",
                signal.as_str(),
                id,
            ],
        )
    }

    fn delete_task(&self, namespace: &str, id: &str) -> Result<(), RuntimeError> {
        checked_status(CTR, &["-n", namespace, "tasks", "delete", id])
    }

    fn delete_container(&self, namespace: &str, id: &str) -> Result<(), RuntimeError> {
        checked_status(CTR, &["-n", namespace, "containers", "delete", id])
    }
}
