//! Container engine reached through the `docker` binary.

use std::time::Duration;

use serde::Deserialize;

use super::{checked_status, checked_stdout, ContainerEngine, ContainerSummary, RuntimeError};

const DOCKER: &str = "docker";

#[derive(Debug, Default)]
pub struct DockerCli;

/// Subset of the `docker inspect` payload the pipeline reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Inspect {
    state: InspectState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectState {
    pid: i32,
    status: String,
}

impl ContainerEngine for DockerCli {
    fn resolve_name(&self, name: &str) -> Result<Option<String>, RuntimeError> {
        // Engine-stored names carry a leading slash, so anchoring with it
        // turns the otherwise-substring name filter into an exact match.
        let filter = format!("name=^/{name}$");
        let stdout = checked_stdout(
            DOCKER,
            &[
                "ps",
                "-a",
                "--no-trunc",
                "--filter",
                &filter,
                "--format",
                "{{.ID}}",
            ],
        )?;
        Ok(stdout.lines().next().map(|id| id.to_string()))
    }

    fn list(&self) -> Result<Vec<ContainerSummary>, RuntimeError> {
        let stdout = checked_stdout(
            DOCKER,
            &["ps", "-a", "--no-trunc", "--format", "{{.ID}} {{.Names}}"],
        )?;
        Ok(stdout
            .lines()
            .filter_map(|line| {
                let (id, name) = line.split_once(' ')?;
                Some(ContainerSummary {
                    id: id.to_string(),
                    name: name.to_string(),
                })
            })
            .collect())
    }

    fn main_pid(&self, id: &str) -> Result<i32, RuntimeError> {
        let stdout = checked_stdout(DOCKER, &["inspect", id])?;
        let inspected: Vec<Inspect> = serde_json::from_str(&stdout).map_err(|source| {
            RuntimeError::Payload {
                command: DOCKER,
                source,
            }
        })?;
        Ok(match inspected.first() {
            Some(container) => {
                log::debug!(
                    "container is {} with pid {}",
                    container.state.status,
                    container.state.pid
                );
                container.state.pid
            }
            None => 0,
        })
    }

    fn stop(&self, id: &str, grace: Duration) -> Result<bool, RuntimeError> {
        let timeout = grace.as_secs().to_string();
        let output = super::output(DOCKER, &["stop", "-t", &timeout, id])?;
        Ok(output.status.success())
    }

    fn force_remove(&self, id: &str) -> Result<(), RuntimeError> {
        checked_status(DOCKER, &["rm", "-f", id])
    }
}
