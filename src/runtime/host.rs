//! Process signaling and discovery against the live host.

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

use super::{ProcessHost, RuntimeError};

#[derive(Debug, Default)]
pub struct LinuxHost;

impl ProcessHost for LinuxHost {
    fn kill(&self, pid: Pid, signal: Signal) -> Result<(), Errno> {
        signal::kill(pid, signal)
    }

    fn alive(&self, pid: Pid) -> bool {
        // null signal: nothing is delivered, only the existence check runs
        signal::kill(pid, None).is_ok()
    }

    fn find_processes(&self, predicate: &dyn Fn(&str) -> bool) -> Result<Vec<Pid>, RuntimeError> {
        let mut pids = Vec::new();
        for process in procfs::process::all_processes()? {
            let process = match process {
                Ok(process) => process,
                // raced with a process exiting mid-walk
                Err(_) => continue,
            };
            let cmdline = match process.cmdline() {
                Ok(cmdline) => cmdline,
                Err(_) => continue,
            };
            // kernel threads have no command line
            if cmdline.is_empty() {
                continue;
            }
            if predicate(&cmdline.join(" ")) {
                pids.push(Pid::from_raw(process.pid()));
            }
        }
        Ok(pids)
    }
}
