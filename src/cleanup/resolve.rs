//! Target resolution.

use super::{Cleanup, CleanupError};

impl Cleanup<'_> {
    /// Map a name or ID fragment to the one container it identifies.
    ///
    /// An exact name match wins outright. Otherwise the first listing entry
    /// whose ID or name contains the fragment is taken, in the engine's own
    /// listing order; ties are not reported.
    pub(crate) fn resolve(&self, target: &str) -> Result<String, CleanupError> {
        if let Some(id) = self.engine.resolve_name(target)? {
            log::debug!("resolved {} by exact name", target);
            return Ok(id);
        }

        for container in self.engine.list()? {
            if container.id.contains(target) || container.name.contains(target) {
                log::debug!("resolved {} to {} by substring", target, container.name);
                return Ok(container.id);
            }
        }

        Err(CleanupError::NotFound(target.to_string()))
    }
}
