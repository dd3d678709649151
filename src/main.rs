//! Command line entry point.

use std::time::Duration;

use clap::Parser;

use unwedge::cleanup::{Cleanup, CleanupError, CleanupRequest};
use unwedge::config::CleanupConfig;
use unwedge::logger;
use unwedge::runtime::ctr::CtrCli;
use unwedge::runtime::docker::DockerCli;
use unwedge::runtime::host::LinuxHost;
use unwedge::runtime::systemctl::SystemdCli;

/// Exit status when the target matches no container.
const EXIT_NOT_FOUND: i32 = 3;
/// Exit status when the container is still listed after the full pass.
const EXIT_STILL_PRESENT: i32 = 4;

/// Stop a stuck container the hard way and clean up what its runtime left
/// behind: shim processes, containerd tasks, systemd scopes and cgroups.
#[derive(Parser, Debug)]
#[clap(version)]
struct Opts {
    /// Container name or ID fragment
    target: String,

    /// Skip the graceful stop and escalate immediately
    #[clap(long)]
    hard: bool,

    /// Restart containerd and docker once cleanup is done
    #[clap(long)]
    restart_daemons: bool,

    /// Grace period in seconds for the engine-level stop
    #[clap(long, default_value_t = 20)]
    grace_period: u64,

    /// containerd namespace the engine's tasks live in
    #[clap(long, default_value = "moby")]
    namespace: String,

    /// Turn on debug logging
    #[clap(short, long)]
    debug: bool,
}

fn main() {
    let opts = Opts::parse();

    if let Err(e) = logger::init(opts.debug) {
        eprintln!("log init failed: {:?}", e);
    }

    let config = CleanupConfig {
        grace_period: Duration::from_secs(opts.grace_period),
        namespace: opts.namespace.clone(),
        ..CleanupConfig::default()
    };

    let engine = DockerCli;
    let supervisor = CtrCli;
    let services = SystemdCli;
    let host = LinuxHost;
    let cleanup = Cleanup::new(config, &engine, &supervisor, &services, &host);

    let request = CleanupRequest {
        hard: opts.hard,
        restart_daemons: opts.restart_daemons,
    };

    let code = match cleanup.run(&opts.target, request) {
        Ok(()) => 0,
        Err(err @ CleanupError::NotFound(_)) => {
            log::error!("{}", err);
            EXIT_NOT_FOUND
        }
        Err(err @ CleanupError::StillPresent(_)) => {
            log::error!("{}", err);
            EXIT_STILL_PRESENT
        }
        Err(err) => {
            log::error!("{}", err);
            1
        }
    };
    std::process::exit(code);
}
