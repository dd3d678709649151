//! Engine-level removal, optional daemon restart, and verification.

use super::{short_id, Cleanup, CleanupError};

impl Cleanup<'_> {
    pub(crate) fn finalize(&self, id: &str, restart_daemons: bool) -> Result<(), CleanupError> {
        log::info!("force removing container {}", short_id(id));
        if let Err(err) = self.engine.force_remove(id) {
            // the record may already be gone; verification below decides
            log::debug!("force remove: {}", err);
        }

        if restart_daemons {
            self.restart_daemons();
        }

        self.verify_removed(id)
    }

    /// The engine daemon depends on the supervisor, so the supervisor has
    /// to come back healthy first.
    fn restart_daemons(&self) {
        log::info!(
            "restarting {} and {}",
            self.config.supervisor_unit,
            self.config.engine_unit
        );
        if let Err(err) = self.services.daemon_reexec() {
            log::warn!("daemon-reexec: {}", err);
        }
        if let Err(err) = self.services.restart_unit(&self.config.supervisor_unit) {
            log::warn!("failed to restart {}: {}", self.config.supervisor_unit, err);
        }
        if let Err(err) = self.services.restart_unit(&self.config.engine_unit) {
            log::warn!("failed to restart {}: {}", self.config.engine_unit, err);
        }
    }

    /// The container may survive any individual failed step, but surviving
    /// the whole pass is an overall failure the caller has to see.
    fn verify_removed(&self, id: &str) -> Result<(), CleanupError> {
        let remaining = self.engine.list()?;
        // listings may carry truncated IDs
        if remaining.iter().any(|container| id.starts_with(&container.id)) {
            return Err(CleanupError::StillPresent(short_id(id).to_string()));
        }
        log::info!("cleanup complete for {}", short_id(id));
        Ok(())
    }
}
