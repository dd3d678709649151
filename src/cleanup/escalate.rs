//! Signal escalation across the runtime stack.
//!
//! A wedged container can survive at three layers independently: the
//! application process, the per-container shim, and the supervisor's task
//! record. Each layer is attacked on its own; a layer that is already gone
//! must never block cleanup of the next one, so every step swallows its
//! own failures.

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

use super::{short_id, Cleanup};

impl Cleanup<'_> {
    pub(crate) fn escalate(&self, id: &str) {
        self.kill_main_process(id);
        self.kill_helpers(id);
        self.reap_supervisor_task(id);
    }

    /// SIGTERM the container's init process, then SIGKILL it if it is
    /// still around after the escalation delay.
    fn kill_main_process(&self, id: &str) {
        let pid = match self.engine.main_pid(id) {
            Ok(pid) => pid,
            Err(err) => {
                log::debug!("no runtime state for {}: {}", short_id(id), err);
                return;
            }
        };
        // zero means no live process; pid 1 would be init
        if pid <= 1 {
            return;
        }

        let pid = Pid::from_raw(pid);
        log::info!("killing container process {}", pid);
        match self.host.kill(pid, Signal::SIGTERM) {
            // already gone, which is what we want
            Err(Errno::ESRCH) => return,
            Err(errno) => log::warn!("failed to signal {}: {}", pid, errno),
            Ok(()) => {}
        }

        std::thread::sleep(self.config.escalation_delay);

        if self.host.alive(pid) {
            log::info!("escalating SIGKILL to {}", pid);
            match self.host.kill(pid, Signal::SIGKILL) {
                Err(errno) if errno != Errno::ESRCH => {
                    log::warn!("failed to SIGKILL {}: {}", pid, errno)
                }
                _ => {}
            }
        }
    }

    /// Kill every leftover runtime helper still referencing the container
    /// on its command line.
    fn kill_helpers(&self, id: &str) {
        let short = short_id(id);
        for helper in &self.config.helper_processes {
            let referenced =
                |cmdline: &str| cmdline.contains(helper.as_str()) && cmdline.contains(short);
            let pids = match self.host.find_processes(&referenced) {
                Ok(pids) => pids,
                Err(err) => {
                    log::warn!("host process listing failed: {}", err);
                    continue;
                }
            };
            if pids.is_empty() {
                continue;
            }
            log::info!("killing {} pids {:?}", helper, pids);
            for pid in pids {
                if pid.as_raw() <= 1 {
                    continue;
                }
                match self.host.kill(pid, Signal::SIGKILL) {
                    Err(errno) if errno != Errno::ESRCH => {
                        log::warn!("failed to SIGKILL {} {}: {}", helper, pid, errno)
                    }
                    _ => {}
                }
            }
        }
    }

    /// Drop the supervisor's task and container records if it still holds
    /// them. Every call is best-effort; the engine-level force remove later
    /// is the backstop.
    fn reap_supervisor_task(&self, id: &str) {
        if !self.supervisor.available() {
            log::debug!("supervisor CLI not present, skipping task cleanup");
            return;
        }
        let namespace = &self.config.namespace;
        let tasks = match self.supervisor.list_tasks(namespace) {
            Ok(tasks) => tasks,
            Err(err) => {
                log::warn!("task listing failed: {}", err);
                return;
            }
        };
        if !tasks.contains(short_id(id)) {
            return;
        }

        log::info!("deleting supervisor task for {}", short_id(id));
        if let Err(err) = self.supervisor.kill_task(namespace, id, Signal::SIGKILL) {
            log::debug!("task kill: {}", err);
        }
        if let Err(err) = self.supervisor.delete_task(namespace, id) {
            log::debug!("task delete: {}", err);
        }
        if let Err(err) = self.supervisor.delete_container(namespace, id) {
            log::debug!("container record delete: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cleanup::Cleanup;
    use crate::runtime::test::{test_config, FakeRuntime};

    const FULL_ID: &str = "93deda9253958b2c1ecd5d58a2c56c74b16d8184e0c6753c107d6adb0d89799e";

    #[test]
    fn init_and_absent_pids_are_never_signaled() {
        for pid in [0, 1, -1] {
            let fake = FakeRuntime {
                pid,
                ..FakeRuntime::default()
            };
            let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

            cleanup.escalate(FULL_ID);

            assert!(
                !fake
                    .calls
                    .borrow()
                    .iter()
                    .any(|call| call.starts_with("signal ")),
                "pid {} was signaled",
                pid
            );
        }
    }

    #[test]
    fn surviving_process_gets_sigkill_after_sigterm() {
        let fake = FakeRuntime {
            pid: 4242,
            alive_after_term: true,
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        cleanup.escalate(FULL_ID);

        let calls = fake.calls.borrow();
        let term = calls
            .iter()
            .position(|c| c == "signal 4242 SIGTERM")
            .unwrap();
        let kill = calls
            .iter()
            .position(|c| c == "signal 4242 SIGKILL")
            .unwrap();
        assert!(term < kill);
    }

    #[test]
    fn exited_process_is_not_sigkilled() {
        let fake = FakeRuntime {
            pid: 4242,
            alive_after_term: false,
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        cleanup.escalate(FULL_ID);

        assert!(!fake
            .calls
            .borrow()
            .iter()
            .any(|call| call == "signal 4242 SIGKILL"));
    }

    #[test]
    fn vanished_main_process_does_not_stop_the_pass() {
        // SIGTERM hits a pid that no longer exists; the shim kill and the
        // supervisor cleanup still have to run
        let fake = FakeRuntime {
            pid: 4242,
            esrch: vec![4242],
            processes: vec![(555, format!("/usr/bin/containerd-shim -id {}", FULL_ID))],
            ctr_available: true,
            tasks: format!("{}    4242    RUNNING", FULL_ID),
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        cleanup.escalate(FULL_ID);

        let calls = fake.calls.borrow();
        assert!(calls.iter().any(|c| c == "signal 555 SIGKILL"));
        assert!(calls.iter().any(|c| c.starts_with("task-delete ")));
    }

    #[test]
    fn only_helpers_referencing_the_container_are_killed() {
        let fake = FakeRuntime {
            processes: vec![
                (555, format!("/usr/bin/containerd-shim -id {}", FULL_ID)),
                (556, "/usr/bin/containerd-shim -id fefefefefefe0000".to_string()),
                (557, format!("runc --root /run/runc kill {}", FULL_ID)),
                (558, "sleep 9000".to_string()),
            ],
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        cleanup.escalate(FULL_ID);

        let calls = fake.calls.borrow();
        assert!(calls.iter().any(|c| c == "signal 555 SIGKILL"));
        assert!(calls.iter().any(|c| c == "signal 557 SIGKILL"));
        assert!(!calls.iter().any(|c| c == "signal 556 SIGKILL"));
        assert!(!calls.iter().any(|c| c == "signal 558 SIGKILL"));
    }

    #[test]
    fn supervisor_cleanup_is_skipped_without_the_cli() {
        let fake = FakeRuntime {
            ctr_available: false,
            tasks: format!("{}    4242    RUNNING", FULL_ID),
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        cleanup.escalate(FULL_ID);

        assert!(!fake
            .calls
            .borrow()
            .iter()
            .any(|call| call.starts_with("tasks-ls")));
    }

    #[test]
    fn configured_namespace_reaches_every_supervisor_call() {
        let fake = FakeRuntime {
            ctr_available: true,
            tasks: format!("{}    4242    RUNNING", FULL_ID),
            ..FakeRuntime::default()
        };
        let mut config = test_config();
        config.namespace = "k8s.io".to_string();
        let cleanup = Cleanup::new(config, &fake, &fake, &fake, &fake);

        cleanup.escalate(FULL_ID);

        let calls = fake.calls.borrow();
        assert!(calls.iter().any(|c| c == "tasks-ls k8s.io"));
        assert!(calls
            .iter()
            .any(|c| c == &format!("task-delete k8s.io {}", FULL_ID)));
    }

    #[test]
    fn unlisted_task_is_left_alone() {
        let fake = FakeRuntime {
            ctr_available: true,
            tasks: "fefefefefefe0000    77    RUNNING".to_string(),
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        cleanup.escalate(FULL_ID);

        let calls = fake.calls.borrow();
        assert!(calls.iter().any(|c| c == "tasks-ls moby"));
        assert!(!calls.iter().any(|c| c.starts_with("task-kill")));
    }
}
