//! Artifact extraction and comparison.
//!
//! Turns a remote container path into a verified local byte comparison:
//! fetch the path as a tar archive, persist it to a fresh temporary
//! directory, extract the single contained file, and compare it
//! byte-for-byte against the reference file on the host.
//!
//! The temporary directory is scoped to one collection call and removed on
//! every exit path.

use crate::error::{HarnessError, Result};
use crate::report::ArtifactOutcome;
use crate::runtime::ContainerRuntime;
use darness_scenario::ScenarioArtifact;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, warn};

/// Collects one artifact from a running container and compares it against
/// its host-side reference file.
///
/// Comparison is over raw bytes, never text, so differing encodings cannot
/// produce false results. Any I/O failure along the way is reported as
/// [`ArtifactOutcome::Error`], distinct from a content mismatch.
pub async fn collect(
    runtime: &dyn ContainerRuntime,
    container_id: &str,
    artifact: &ScenarioArtifact,
) -> ArtifactOutcome {
    match try_collect(runtime, container_id, artifact).await {
        Ok(true) => ArtifactOutcome::Match,
        Ok(false) => {
            warn!(artifact = %artifact.name, "artifact does not match expected contents");
            ArtifactOutcome::Mismatch
        }
        Err(e) => {
            warn!(artifact = %artifact.name, error = %e, "artifact collection failed");
            ArtifactOutcome::Error(e.to_string())
        }
    }
}

async fn try_collect(
    runtime: &dyn ContainerRuntime,
    container_id: &str,
    artifact: &ScenarioArtifact,
) -> Result<bool> {
    let archive = runtime
        .get_archive(container_id, &artifact.location)
        .await
        .map_err(|cause| HarnessError::Collection {
            name: artifact.name.clone(),
            cause,
        })?;

    // One fresh directory per artifact; dropped (and deleted) on every
    // exit path out of this function.
    let tmp = tempfile::tempdir()?;
    let tar_path = tmp.path().join(format!("{}.tar", artifact.name));
    std::fs::write(&tar_path, &archive)?;

    let extracted = extract_single_entry(&tar_path, tmp.path(), artifact)?;
    debug!(
        artifact = %artifact.name,
        extracted = %extracted.display(),
        "extracted artifact"
    );

    let actual = std::fs::read(&extracted)?;
    let expected = std::fs::read(&artifact.comparison_location)?;
    Ok(actual == expected)
}

/// Extracts the archive's single regular-file entry to
/// `<dest>/<artifact.name>` and returns that path.
///
/// The archive is expected to contain exactly one regular file. If several
/// are present, the entry whose file name matches the artifact's name or
/// the basename of its container location is taken; anything else is a
/// collection error rather than undefined behavior.
fn extract_single_entry(
    tar_path: &Path,
    dest: &Path,
    artifact: &ScenarioArtifact,
) -> Result<PathBuf> {
    let expected_basename = Path::new(&artifact.location)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    let file = File::open(tar_path)?;
    let mut archive = Archive::new(file);

    let mut regular_entries = 0usize;
    let mut saw_named_match = false;
    let mut extracted: Option<PathBuf> = None;

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_type = entry.header().entry_type();
        if !matches!(entry_type, tar::EntryType::Regular | tar::EntryType::Continuous) {
            continue;
        }
        regular_entries += 1;

        let entry_name = entry
            .path()?
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let matches_expected = entry_name == artifact.name
            || expected_basename.as_deref() == Some(entry_name.as_str());
        saw_named_match |= matches_expected;

        // First regular entry wins; a later named match replaces it.
        if extracted.is_none() || matches_expected {
            let out_path = dest.join(&artifact.name);
            let mut out = File::create(&out_path)?;
            std::io::copy(&mut entry, &mut out)?;
            extracted = Some(out_path);
        }
    }

    match extracted {
        Some(path) if regular_entries == 1 || saw_named_match => Ok(path),
        Some(_) => Err(HarnessError::Collection {
            name: artifact.name.clone(),
            cause: format!(
                "archive contains {regular_entries} files and none matches the expected name"
            ),
        }),
        None => Err(HarnessError::Collection {
            name: artifact.name.clone(),
            cause: "archive contains no regular file entry".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    fn tar_with_entries(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_path(path).unwrap();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append(&header, *content).unwrap();
        }
        builder.into_inner().unwrap()
    }

    /// Runtime stub that serves a canned archive for `get_archive`.
    struct ArchiveStub {
        archive: Mutex<Vec<u8>>,
    }

    impl ArchiveStub {
        fn new(archive: Vec<u8>) -> Self {
            Self {
                archive: Mutex::new(archive),
            }
        }
    }

    #[async_trait]
    impl ContainerRuntime for ArchiveStub {
        async fn create_container(
            &self,
            _image: &str,
            _entrypoint: &[String],
        ) -> std::result::Result<String, String> {
            Ok("stub".to_string())
        }

        async fn start_container(&self, _id: &str) -> std::result::Result<(), String> {
            Ok(())
        }

        async fn exec(&self, _id: &str, _argv: &[String]) -> std::result::Result<String, String> {
            Ok(String::new())
        }

        async fn get_archive(
            &self,
            _id: &str,
            _path: &str,
        ) -> std::result::Result<Bytes, String> {
            Ok(Bytes::from(self.archive.lock().unwrap().clone()))
        }

        async fn stop_container(&self, _id: &str) -> std::result::Result<(), String> {
            Ok(())
        }

        async fn remove_container(
            &self,
            _id: &str,
            _force: bool,
        ) -> std::result::Result<(), String> {
            Ok(())
        }
    }

    fn fixture(dir: &Path, contents: &[u8]) -> ScenarioArtifact {
        let reference = dir.join("expected.txt");
        std::fs::write(&reference, contents).unwrap();
        ScenarioArtifact {
            name: "f".to_string(),
            location: "/tmp/f".to_string(),
            comparison_location: reference.display().to_string(),
        }
    }

    #[tokio::test]
    async fn identical_bytes_match() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = fixture(dir.path(), b"hi\n");
        let stub = ArchiveStub::new(tar_with_entries(&[("f", b"hi\n")]));

        let outcome = collect(&stub, "c1", &artifact).await;
        assert_eq!(outcome, ArtifactOutcome::Match);
    }

    #[tokio::test]
    async fn single_differing_byte_mismatches() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = fixture(dir.path(), b"hi\n");
        let stub = ArchiveStub::new(tar_with_entries(&[("f", b"hj\n")]));

        let outcome = collect(&stub, "c1", &artifact).await;
        assert_eq!(outcome, ArtifactOutcome::Mismatch);
    }

    #[tokio::test]
    async fn binary_content_compares_as_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        // Not valid UTF-8; a text comparison would misreport this.
        let payload: &[u8] = &[0x00, 0xff, 0xfe, 0x80, 0x01];
        let artifact = fixture(dir.path(), payload);
        let stub = ArchiveStub::new(tar_with_entries(&[("f", payload)]));

        let outcome = collect(&stub, "c1", &artifact).await;
        assert_eq!(outcome, ArtifactOutcome::Match);
    }

    #[tokio::test]
    async fn entry_named_after_location_basename_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("expected.txt");
        std::fs::write(&reference, b"data").unwrap();
        let artifact = ScenarioArtifact {
            name: "renamed".to_string(),
            location: "/var/log/out.txt".to_string(),
            comparison_location: reference.display().to_string(),
        };
        let stub = ArchiveStub::new(tar_with_entries(&[("out.txt", b"data")]));

        let outcome = collect(&stub, "c1", &artifact).await;
        assert_eq!(outcome, ArtifactOutcome::Match);
    }

    #[tokio::test]
    async fn empty_archive_is_a_collection_error() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = fixture(dir.path(), b"hi\n");
        let stub = ArchiveStub::new(tar_with_entries(&[]));

        let outcome = collect(&stub, "c1", &artifact).await;
        assert!(matches!(outcome, ArtifactOutcome::Error(_)));
    }

    #[tokio::test]
    async fn multiple_unnamed_entries_are_a_collection_error() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = fixture(dir.path(), b"hi\n");
        let stub = ArchiveStub::new(tar_with_entries(&[
            ("one.txt", b"hi\n"),
            ("two.txt", b"hi\n"),
        ]));

        let outcome = collect(&stub, "c1", &artifact).await;
        assert!(matches!(outcome, ArtifactOutcome::Error(_)));
    }

    #[tokio::test]
    async fn multiple_entries_with_named_match_extracts_the_match() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = fixture(dir.path(), b"wanted");
        let stub = ArchiveStub::new(tar_with_entries(&[
            ("other.txt", b"noise"),
            ("f", b"wanted"),
        ]));

        let outcome = collect(&stub, "c1", &artifact).await;
        assert_eq!(outcome, ArtifactOutcome::Match);
    }

    #[tokio::test]
    async fn runtime_fetch_failure_is_a_collection_error() {
        struct FailingFetch;

        #[async_trait]
        impl ContainerRuntime for FailingFetch {
            async fn create_container(
                &self,
                _image: &str,
                _entrypoint: &[String],
            ) -> std::result::Result<String, String> {
                Ok("stub".to_string())
            }
            async fn start_container(&self, _id: &str) -> std::result::Result<(), String> {
                Ok(())
            }
            async fn exec(
                &self,
                _id: &str,
                _argv: &[String],
            ) -> std::result::Result<String, String> {
                Ok(String::new())
            }
            async fn get_archive(
                &self,
                _id: &str,
                _path: &str,
            ) -> std::result::Result<Bytes, String> {
                Err("no such path".to_string())
            }
            async fn stop_container(&self, _id: &str) -> std::result::Result<(), String> {
                Ok(())
            }
            async fn remove_container(
                &self,
                _id: &str,
                _force: bool,
            ) -> std::result::Result<(), String> {
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let artifact = fixture(dir.path(), b"hi\n");
        let outcome = collect(&FailingFetch, "c1", &artifact).await;
        assert!(matches!(outcome, ArtifactOutcome::Error(_)));
    }

    #[tokio::test]
    async fn missing_reference_file_is_a_collection_error() {
        let artifact = ScenarioArtifact {
            name: "f".to_string(),
            location: "/tmp/f".to_string(),
            comparison_location: "/no/such/fixture.txt".to_string(),
        };
        let stub = ArchiveStub::new(tar_with_entries(&[("f", b"hi\n")]));

        let outcome = collect(&stub, "c1", &artifact).await;
        assert!(matches!(outcome, ArtifactOutcome::Error(_)));
    }

    #[test]
    fn extraction_scratch_space_is_removed() {
        // extract_single_entry works inside a TempDir owned by
        // try_collect; verify the TempDir scoping we rely on.
        let path;
        {
            let tmp = tempfile::tempdir().unwrap();
            path = tmp.path().to_path_buf();
            std::fs::write(path.join("scratch"), b"x").unwrap();
        }
        assert!(!path.exists());
    }
}
