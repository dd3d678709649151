//! Init system reached through the `systemctl` binary.

use super::{checked_status, RuntimeError, ServiceManager};

const SYSTEMCTL: &str = "systemctl";

#[derive(Debug, Default)]
pub struct SystemdCli;

impl ServiceManager for SystemdCli {
    fn stop_unit(&self, unit: &str) -> Result<(), RuntimeError> {
        checked_status(SYSTEMCTL, &["stop", unit])
    }

    fn reset_failed(&self, unit: &str) -> Result<(), RuntimeError> {
        checked_status(SYSTEMCTL, &["reset-failed", unit])
    }

    fn daemon_reexec(&self) -> Result<(), RuntimeError> {
        checked_status(SYSTEMCTL, &["daemon-reexec"])
    }

    fn restart_unit(&self, unit: &str) -> Result<(), RuntimeError> {
        checked_status(SYSTEMCTL, &["restart", unit])
    }
}
