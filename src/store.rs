//! Temporary storage for submitted queries.
//!
//! The interpreter only reads procedures from files, so every request body
//! is written to its own `abl_<nanos>.4gl` file and removed once the
//! request is done with it.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::consts::{ARTIFACT_EXTENSION, ARTIFACT_PREFIX};
use crate::error::StoreError;

/// Writes query artifacts under a fixed directory.
#[derive(Debug, Clone)]
pub struct QueryStore {
    dir: PathBuf,
}

impl QueryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist `body` to a fresh artifact file.
    ///
    /// Names come from the wall clock in nanoseconds. The file is opened
    /// with create-new, so if two requests land on the same instant the
    /// later one steps forward a nanosecond instead of sharing a file.
    pub async fn store(&self, body: &[u8]) -> Result<QueryArtifact, StoreError> {
        self.store_from(now_nanos(), body).await
    }

    async fn store_from(&self, mut nanos: u128, body: &[u8]) -> Result<QueryArtifact, StoreError> {
        loop {
            let path = self.dir.join(artifact_name(nanos));
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            let mut file = match opened {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    nanos += 1;
                    continue;
                }
                Err(source) => return Err(StoreError::Write { path, source }),
            };

            // From here on the file exists, so failures must clean it up.
            let artifact = QueryArtifact::new(path);
            if let Err(source) = write_all(&mut file, body).await {
                let path = artifact.path().to_path_buf();
                drop(file);
                artifact.release().await;
                return Err(StoreError::Write { path, source });
            }

            debug!(path = %artifact.path().display(), bytes = body.len(), "stored query");
            return Ok(artifact);
        }
    }

    /// Remove the artifact at `path`. Never fails: a file that is already
    /// gone is fine, anything else is logged and left for the OS temp
    /// cleaner.
    pub async fn release(path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "released query"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove query file"),
        }
    }
}

/// A stored query owned by exactly one request.
///
/// Call [`QueryArtifact::release`] when done. If the owner is dropped
/// first (the client went away and the handler future was cancelled) the
/// file is removed on drop instead.
#[derive(Debug)]
pub struct QueryArtifact {
    path: PathBuf,
    released: bool,
}

impl QueryArtifact {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn release(mut self) {
        QueryStore::release(&self.path).await;
        self.released = true;
    }
}

impl Drop for QueryArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "released query on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove query file on drop")
            }
        }
    }
}

fn now_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

fn artifact_name(nanos: u128) -> String {
    format!("{ARTIFACT_PREFIX}{nanos}.{ARTIFACT_EXTENSION}")
}

async fn write_all(file: &mut tokio::fs::File, body: &[u8]) -> io::Result<()> {
    file.write_all(body).await?;
    file.flush().await
}
