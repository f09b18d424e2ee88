//! # darness-docker
//!
//! Docker Engine API client for the darness harness.
//!
//! Speaks HTTP/1.1 over the daemon's Unix socket and implements the
//! [`darness_harness::ContainerRuntime`] capability: create, start, exec
//! with collected output, archive fetch, stop, and (forced) remove.
//!
//! The client carries no connection state; each request opens a fresh
//! connection to the socket. Socket resolution order: explicit path,
//! `DOCKER_HOST` (unix:// URLs), then `/var/run/docker.sock`.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
mod runtime;

pub use client::{DockerClient, DEFAULT_SOCKET_PATH};
