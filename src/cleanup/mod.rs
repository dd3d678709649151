//! The cleanup pipeline.
//!
//! Resolution, graceful stop, escalation, scope reclaim and finalization
//! run as one forward pass over a resolved container ID. Every external
//! action past resolution is best-effort: a missing process, task or unit
//! means someone else already cleaned that layer up, never a reason to
//! stop. Only two conditions escape to the exit status: an unresolvable
//! target, and a container that survives the whole pass.

mod escalate;
mod finalize;
mod graceful;
mod resolve;
mod scope;

use crate::config::CleanupConfig;
use crate::runtime::{ContainerEngine, ProcessHost, RuntimeError, ServiceManager, TaskSupervisor};

/// Everything past resolution keys off the short form of the ID, the
/// engine's convention for shortened identifiers.
pub(crate) fn short_id(id: &str) -> &str {
    &id[..id.len().min(12)]
}

/// How the caller asked the pipeline to behave.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupRequest {
    /// Skip the graceful stop and escalate immediately.
    pub hard: bool,
    /// Restart the runtime daemons once cleanup is done.
    pub restart_daemons: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("no container matches {0}")]
    NotFound(String),
    #[error("container {0} still present after cleanup")]
    StillPresent(String),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// One cleanup pass over a single container.
pub struct Cleanup<'a> {
    config: CleanupConfig,
    engine: &'a dyn ContainerEngine,
    supervisor: &'a dyn TaskSupervisor,
    services: &'a dyn ServiceManager,
    host: &'a dyn ProcessHost,
}

impl<'a> Cleanup<'a> {
    pub fn new(
        config: CleanupConfig,
        engine: &'a dyn ContainerEngine,
        supervisor: &'a dyn TaskSupervisor,
        services: &'a dyn ServiceManager,
        host: &'a dyn ProcessHost,
    ) -> Self {
        Self {
            config,
            engine,
            supervisor,
            services,
            host,
        }
    }

    /// Run the full pipeline against `target`.
    pub fn run(&self, target: &str, request: CleanupRequest) -> Result<(), CleanupError> {
        let id = self.resolve(target)?;
        log::info!("target container {}", short_id(&id));

        if !request.hard {
            if self.graceful_stop(&id) {
                log::info!("graceful stop succeeded");
                return self.finalize(&id, request.restart_daemons);
            }
            log::info!("graceful stop failed, continuing with hard cleanup");
        }

        self.escalate(&id);
        self.reclaim_scope(&id);
        self.finalize(&id, request.restart_daemons)
    }
}
