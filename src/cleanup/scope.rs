//! systemd scope and cgroup teardown.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::Cleanup;

/// The engine names container scope units after the full ID.
const SCOPE_PREFIX: &str = "docker-";
const SCOPE_SUFFIX: &str = ".scope";

pub(crate) fn scope_unit(id: &str) -> String {
    format!("{SCOPE_PREFIX}{id}{SCOPE_SUFFIX}")
}

impl Cleanup<'_> {
    /// Stop the container's scope unit, clear its failed state, and remove
    /// whatever cgroup directory systemd left behind. All best-effort.
    pub(crate) fn reclaim_scope(&self, id: &str) {
        let unit = scope_unit(id);
        let cgroup_dir = self.config.cgroup_root.join(&unit);

        log::info!("cleaning up scope {}", unit);
        if let Err(err) = self.services.stop_unit(&unit) {
            log::debug!("scope stop: {}", err);
        }
        // a stopped-but-failed unit blocks reuse of the scope name
        if let Err(err) = self.services.reset_failed(&unit) {
            log::debug!("reset-failed: {}", err);
        }

        if !cgroup_dir.is_dir() {
            return;
        }
        log::info!("removing cgroup dir {}", cgroup_dir.display());
        // the fast path only succeeds on an already-empty directory
        if let Err(err) = fs::remove_dir(&cgroup_dir) {
            log::debug!("plain removal failed ({}), removing recursively", err);
            remove_dir_forced(&cgroup_dir);
        }
    }
}

/// Recursive forced removal. The runtime may reclaim the directory on its
/// own at any moment, so a not-found race is fine.
fn remove_dir_forced(dir: &Path) {
    match fs::remove_dir_all(dir) {
        Err(err) if err.kind() != ErrorKind::NotFound => {
            log::warn!("failed to remove {}: {}", dir.display(), err)
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::scope_unit;
    use crate::cleanup::Cleanup;
    use crate::runtime::test::{test_config, FakeRuntime};

    const FULL_ID: &str = "93deda9253958b2c1ecd5d58a2c56c74b16d8184e0c6753c107d6adb0d89799e";

    #[test]
    fn unit_name_is_derived_from_the_full_id() {
        assert_eq!(scope_unit("abc"), "docker-abc.scope");
    }

    #[test]
    fn stops_and_resets_the_scope_unit() {
        let fake = FakeRuntime::default();
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        cleanup.reclaim_scope(FULL_ID);

        assert_eq!(
            *fake.calls.borrow(),
            vec![
                format!("unit-stop docker-{}.scope", FULL_ID),
                format!("reset-failed docker-{}.scope", FULL_ID),
            ]
        );
    }

    #[test]
    fn removes_an_empty_cgroup_dir() {
        let root = tempfile::tempdir().unwrap();
        let cgroup_dir = root.path().join(scope_unit(FULL_ID));
        fs::create_dir(&cgroup_dir).unwrap();

        let fake = FakeRuntime::default();
        let mut config = test_config();
        config.cgroup_root = root.path().to_path_buf();
        let cleanup = Cleanup::new(config, &fake, &fake, &fake, &fake);

        cleanup.reclaim_scope(FULL_ID);

        assert!(!cgroup_dir.exists());
    }

    #[test]
    fn falls_back_to_recursive_removal_when_not_empty() {
        let root = tempfile::tempdir().unwrap();
        let cgroup_dir = root.path().join(scope_unit(FULL_ID));
        fs::create_dir(&cgroup_dir).unwrap();
        fs::write(cgroup_dir.join("cgroup.procs"), "4242\n").unwrap();

        let fake = FakeRuntime::default();
        let mut config = test_config();
        config.cgroup_root = root.path().to_path_buf();
        let cleanup = Cleanup::new(config, &fake, &fake, &fake, &fake);

        cleanup.reclaim_scope(FULL_ID);

        assert!(!cgroup_dir.exists());
    }

    #[test]
    fn missing_cgroup_dir_is_fine() {
        let root = tempfile::tempdir().unwrap();

        let fake = FakeRuntime::default();
        let mut config = test_config();
        config.cgroup_root = root.path().to_path_buf();
        let cleanup = Cleanup::new(config, &fake, &fake, &fake, &fake);

        cleanup.reclaim_scope(FULL_ID);
    }
}
