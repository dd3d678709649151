//! The graceful stop, tried exactly once.

use super::{short_id, Cleanup};

impl Cleanup<'_> {
    /// Ask the engine to stop the container within the configured grace
    /// period. A failure here is the escalation trigger, not an error, so
    /// everything non-zero collapses to `false`.
    pub(crate) fn graceful_stop(&self, id: &str) -> bool {
        log::info!(
            "trying graceful stop of {} with {}s grace period",
            short_id(id),
            self.config.grace_period.as_secs()
        );
        match self.engine.stop(id, self.config.grace_period) {
            Ok(stopped) => stopped,
            Err(err) => {
                log::warn!("engine stop did not run: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cleanup::Cleanup;
    use crate::runtime::test::{test_config, FakeRuntime};

    #[test]
    fn zero_exit_is_success() {
        let fake = FakeRuntime {
            stop_succeeds: true,
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        assert!(cleanup.graceful_stop("abc123"));
    }

    #[test]
    fn non_zero_exit_is_failure() {
        let fake = FakeRuntime {
            stop_succeeds: false,
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        assert!(!cleanup.graceful_stop("abc123"));
    }

    #[test]
    fn a_stop_that_cannot_run_is_failure_not_panic() {
        let fake = FakeRuntime {
            stop_error: true,
            ..FakeRuntime::default()
        };
        let cleanup = Cleanup::new(test_config(), &fake, &fake, &fake, &fake);

        assert!(!cleanup.graceful_stop("abc123"));
    }
}
