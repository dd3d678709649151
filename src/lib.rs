//! # unwedge
//! Operator tool that force-stops a wedged container and reclaims the
//! host-level resources its runtime failed to release: leftover shim
//! processes, containerd tasks, systemd scope units and cgroup directories.
//!
//! The crate is a single forward pipeline (resolve, stop, escalate,
//! reclaim, finalize) over one container ID. See [`cleanup::Cleanup`].

pub mod cleanup;
pub mod config;
pub mod logger;
pub mod runtime;
