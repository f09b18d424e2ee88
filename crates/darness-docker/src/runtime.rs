//! `ContainerRuntime` implementation for the Docker client.

use crate::client::DockerClient;
use async_trait::async_trait;
use bytes::Bytes;
use darness_harness::ContainerRuntime;

#[async_trait]
impl ContainerRuntime for DockerClient {
    async fn create_container(
        &self,
        image: &str,
        entrypoint: &[String],
    ) -> Result<String, String> {
        DockerClient::create_container(self, image, entrypoint)
            .await
            .map_err(|e| format!("{e:#}"))
    }

    async fn start_container(&self, id: &str) -> Result<(), String> {
        DockerClient::start_container(self, id)
            .await
            .map_err(|e| format!("{e:#}"))
    }

    async fn exec(&self, id: &str, argv: &[String]) -> Result<String, String> {
        DockerClient::exec(self, id, argv)
            .await
            .map_err(|e| format!("{e:#}"))
    }

    async fn get_archive(&self, id: &str, path: &str) -> Result<Bytes, String> {
        DockerClient::get_archive(self, id, path)
            .await
            .map_err(|e| format!("{e:#}"))
    }

    async fn stop_container(&self, id: &str) -> Result<(), String> {
        DockerClient::stop_container(self, id)
            .await
            .map_err(|e| format!("{e:#}"))
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<(), String> {
        DockerClient::remove_container(self, id, force)
            .await
            .map_err(|e| format!("{e:#}"))
    }
}
