//! Docker daemon client.
//!
//! Provides an HTTP client for the Docker Engine API via Unix socket.

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::net::UnixStream;

/// Default socket path for the Docker daemon.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";

/// Docker Engine API version prefix used for all requests.
const API_VERSION: &str = "v1.43";

/// Docker daemon client.
pub struct DockerClient {
    socket_path: PathBuf,
}

impl DockerClient {
    /// Creates a client with the default socket path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }

    /// Creates a client with a custom socket path.
    pub fn with_socket(path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolves the daemon socket from an explicit path, the
    /// `DOCKER_HOST` environment variable (`unix://` URLs), or the
    /// default location, in that order.
    #[must_use]
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::with_socket(path);
        }
        if let Ok(host) = std::env::var("DOCKER_HOST") {
            if let Some(path) = host.strip_prefix("unix://") {
                return Self::with_socket(path);
            }
        }
        Self::new()
    }

    /// Returns the socket path.
    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Checks if the daemon is reachable.
    pub async fn is_running(&self) -> bool {
        self.ping().await.is_ok()
    }

    /// Pings the daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon cannot be reached.
    pub async fn ping(&self) -> Result<()> {
        self.request(Method::GET, "/_ping", None::<()>).await?;
        Ok(())
    }

    // ========================================================================
    // Container operations
    // ========================================================================

    /// Creates a container and returns its id.
    ///
    /// The container is created with a TTY and an open stdin so the
    /// entrypoint shell idles instead of exiting, leaving exec in charge
    /// of running commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon rejects the request.
    pub async fn create_container(&self, image: &str, entrypoint: &[String]) -> Result<String> {
        let body = CreateContainerRequest {
            image: image.to_string(),
            entrypoint: entrypoint.to_vec(),
            tty: true,
            open_stdin: true,
            attach_stdout: true,
            attach_stderr: true,
        };
        let response: CreateContainerResponse = self
            .post(&format!("/{API_VERSION}/containers/create"), Some(&body))
            .await?;
        for warning in &response.warnings {
            tracing::warn!(warning = %warning, "daemon warning on container create");
        }
        Ok(response.id)
    }

    /// Starts a created container.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon rejects the request.
    pub async fn start_container(&self, id: &str) -> Result<()> {
        self.request(
            Method::POST,
            &format!("/{API_VERSION}/containers/{id}/start"),
            None::<()>,
        )
        .await?;
        Ok(())
    }

    /// Executes a command inside a running container and returns its
    /// combined stdout and stderr as one text blob.
    ///
    /// A non-zero exit status of the command is not surfaced as an error;
    /// only transport and daemon failures are.
    ///
    /// # Errors
    ///
    /// Returns an error if the exec instance cannot be created or started.
    pub async fn exec(&self, id: &str, argv: &[String]) -> Result<String> {
        let create = ExecCreateRequest {
            attach_stdout: true,
            attach_stderr: true,
            cmd: argv.to_vec(),
        };
        let created: ExecCreateResponse = self
            .post(&format!("/{API_VERSION}/containers/{id}/exec"), Some(&create))
            .await
            .context("failed to create exec instance")?;

        let start = ExecStartRequest {
            detach: false,
            tty: false,
        };
        let raw = self
            .request(
                Method::POST,
                &format!("/{API_VERSION}/exec/{}/start", created.id),
                Some(&start),
            )
            .await
            .context("failed to start exec instance")?;

        Ok(demultiplex_output(&raw))
    }

    /// Fetches a path from the container filesystem as a tar archive,
    /// fully read into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or the daemon fails.
    pub async fn get_archive(&self, id: &str, path: &str) -> Result<Bytes> {
        let query = encode_query_value(path);
        self.request(
            Method::GET,
            &format!("/{API_VERSION}/containers/{id}/archive?path={query}"),
            None::<()>,
        )
        .await
    }

    /// Stops a running container. A container that has already stopped is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon rejects the request.
    pub async fn stop_container(&self, id: &str) -> Result<()> {
        let (status, body) = self
            .request_raw(
                Method::POST,
                &format!("/{API_VERSION}/containers/{id}/stop"),
                None::<()>,
            )
            .await?;
        // 304: container was not running.
        if status.is_success() || status == StatusCode::NOT_MODIFIED {
            Ok(())
        } else {
            anyhow::bail!(
                "daemon returned error {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )
        }
    }

    /// Removes a container. With `force`, removal does not require the
    /// container to be stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon rejects the request.
    pub async fn remove_container(&self, id: &str, force: bool) -> Result<()> {
        self.request(
            Method::DELETE,
            &format!("/{API_VERSION}/containers/{id}?force={force}"),
            None::<()>,
        )
        .await?;
        Ok(())
    }

    // ========================================================================
    // HTTP plumbing
    // ========================================================================

    /// Performs a POST request and parses the JSON response.
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let bytes = self.request(Method::POST, path, body).await?;
        serde_json::from_slice(&bytes).context("failed to parse response")
    }

    /// Performs an HTTP request, failing on non-success statuses.
    async fn request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<Bytes> {
        let (status, bytes) = self.request_raw(method, path, body).await?;
        if !status.is_success() {
            anyhow::bail!(
                "daemon returned error {}: {}",
                status,
                String::from_utf8_lossy(&bytes)
            );
        }
        Ok(bytes)
    }

    /// Performs an HTTP request to the daemon over a fresh socket
    /// connection, returning the status and the fully collected body.
    async fn request_raw<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<(StatusCode, Bytes)> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .with_context(|| {
                format!(
                    "failed to connect to docker daemon at {}",
                    self.socket_path.display()
                )
            })?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .context("HTTP handshake failed")?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!("connection closed: {}", e);
            }
        });

        let request = if let Some(body) = body {
            let body_bytes = serde_json::to_vec(&body).context("failed to serialize body")?;
            Request::builder()
                .method(method)
                .uri(format!("http://localhost{path}"))
                .header("Host", "localhost")
                .header("Content-Type", "application/json")
                .header("Content-Length", body_bytes.len())
                .body(Full::new(Bytes::from(body_bytes)))
                .context("failed to build request")?
        } else {
            Request::builder()
                .method(method)
                .uri(format!("http://localhost{path}"))
                .header("Host", "localhost")
                .body(Full::new(Bytes::new()))
                .context("failed to build request")?
        };

        let response = sender
            .send_request(request)
            .await
            .context("failed to send request")?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .context("failed to read response")?
            .to_bytes();

        Ok((status, bytes))
    }
}

impl Default for DockerClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Docker API Types
// =============================================================================

/// Create container request.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateContainerRequest {
    image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entrypoint: Vec<String>,
    tty: bool,
    open_stdin: bool,
    attach_stdout: bool,
    attach_stderr: bool,
}

/// Create container response.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateContainerResponse {
    id: String,
    #[serde(default)]
    warnings: Vec<String>,
}

/// Exec create request.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExecCreateRequest {
    attach_stdout: bool,
    attach_stderr: bool,
    cmd: Vec<String>,
}

/// Exec create response.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExecCreateResponse {
    id: String,
}

/// Exec start request.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExecStartRequest {
    detach: bool,
    tty: bool,
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Collapses a Docker exec output stream into one text blob.
///
/// Without a TTY the daemon multiplexes stdout and stderr into 8-byte
/// framed chunks; with a TTY the stream is raw. Frames are concatenated in
/// arrival order so the blob reads as the combined console output.
fn demultiplex_output(raw: &[u8]) -> String {
    // Raw (non-multiplexed) output: no frame header to speak of.
    if raw.len() < 8 || raw[0] > 2 {
        return String::from_utf8_lossy(raw).into_owned();
    }

    let mut output = String::new();
    let mut buffer = raw;
    while let Some((_, content)) = extract_stream_frame(buffer) {
        output.push_str(&String::from_utf8_lossy(content));
        buffer = &buffer[8 + content.len()..];
    }
    // Trailing bytes that do not form a complete frame.
    if !buffer.is_empty() && output.is_empty() {
        return String::from_utf8_lossy(raw).into_owned();
    }
    output
}

/// Extracts a single frame from a Docker stream buffer.
///
/// Docker stream format: [stream_type (1 byte)][padding (3 bytes)][size (4 bytes BE)][data]
/// - stream_type: 0 = stdin, 1 = stdout, 2 = stderr
///
/// Returns (stream_type, content) if a complete frame is available, None otherwise.
fn extract_stream_frame(buffer: &[u8]) -> Option<(u8, &[u8])> {
    if buffer.len() < 8 {
        return None;
    }

    let stream_type = buffer[0];
    let size = u32::from_be_bytes([buffer[4], buffer[5], buffer[6], buffer[7]]) as usize;

    let frame_end = 8 + size;
    if buffer.len() < frame_end {
        return None;
    }

    Some((stream_type, &buffer[8..frame_end]))
}

/// Percent-encodes a query parameter value. Keeps unreserved characters
/// and `/`, which the daemon accepts unencoded in archive paths.
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                encoded.push_str(&format!("{byte:02X}"));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(stream_type: u8, content: &[u8]) -> Vec<u8> {
        let mut out = vec![stream_type, 0, 0, 0];
        out.extend_from_slice(&(content.len() as u32).to_be_bytes());
        out.extend_from_slice(content);
        out
    }

    #[test]
    fn demultiplex_interleaves_stdout_and_stderr_in_order() {
        let mut raw = frame(1, b"out1 ");
        raw.extend(frame(2, b"err1 "));
        raw.extend(frame(1, b"out2"));

        assert_eq!(demultiplex_output(&raw), "out1 err1 out2");
    }

    #[test]
    fn demultiplex_passes_raw_tty_output_through() {
        assert_eq!(demultiplex_output(b"plain shell output"), "plain shell output");
        assert_eq!(demultiplex_output(b"hi"), "hi");
        assert_eq!(demultiplex_output(b""), "");
    }

    #[test]
    fn extract_stream_frame_requires_complete_frame() {
        let full = frame(1, b"hello");
        assert_eq!(extract_stream_frame(&full), Some((1u8, &b"hello"[..])));
        assert_eq!(extract_stream_frame(&full[..7]), None);
        assert_eq!(extract_stream_frame(&full[..10]), None);
    }

    #[test]
    fn encode_query_value_keeps_paths_readable() {
        assert_eq!(encode_query_value("/tmp/out.txt"), "/tmp/out.txt");
        assert_eq!(encode_query_value("/tmp/with space"), "/tmp/with%20space");
        assert_eq!(encode_query_value("/tmp/a+b"), "/tmp/a%2Bb");
    }

    #[test]
    fn resolve_prefers_explicit_socket() {
        let client = DockerClient::resolve(Some(PathBuf::from("/tmp/custom.sock")));
        assert_eq!(client.socket_path(), Path::new("/tmp/custom.sock"));
    }
}
