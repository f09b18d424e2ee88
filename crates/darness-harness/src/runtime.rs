//! Container runtime capability.

use async_trait::async_trait;
use bytes::Bytes;

/// Trait for the container runtime the harness drives.
///
/// This trait abstracts the operations the execution engine needs from a
/// container runtime, allowing different implementations (real Docker
/// daemon, mock for testing). Errors are plain strings: the harness maps
/// them into its own taxonomy at the call site, and implementations stay
/// free of the engine's error types.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Creates a container from an image with the given entrypoint,
    /// returning an opaque container handle.
    ///
    /// The container is created with TTY semantics and the entrypoint is
    /// expected to yield an idle shell, so subsequent exec calls run the
    /// scenario's commands rather than the image's default process.
    async fn create_container(
        &self,
        image: &str,
        entrypoint: &[String],
    ) -> std::result::Result<String, String>;

    /// Starts a created container.
    async fn start_container(&self, id: &str) -> std::result::Result<(), String>;

    /// Executes a command inside a running container and returns its
    /// combined stdout and stderr, fully collected.
    ///
    /// A non-zero exit status of the command is not an error; only a
    /// failure of the exec call itself is.
    async fn exec(&self, id: &str, argv: &[String]) -> std::result::Result<String, String>;

    /// Fetches a path from the container filesystem as a tar archive,
    /// fully read into memory.
    async fn get_archive(&self, id: &str, path: &str) -> std::result::Result<Bytes, String>;

    /// Stops a running container.
    async fn stop_container(&self, id: &str) -> std::result::Result<(), String>;

    /// Removes a container. With `force`, removal does not require the
    /// container to have stopped cleanly.
    async fn remove_container(&self, id: &str, force: bool) -> std::result::Result<(), String>;
}
