#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use progress_proxy::config::ProxyConfig;
use progress_proxy::pipeline::Pipeline;
use tempfile::TempDir;

/// Prints the query file to stdout and a fixed marker to stderr.
pub const ECHO_SCRIPT: &str = "cat \"$3\"\nprintf 'fixed-stderr' >&2\n";

/// A stand-in interpreter plus an isolated artifact directory.
///
/// The configured binary is `sh` and the database slot carries the script
/// path, so `sh <script> -b -p <file>` hands the query file to the script
/// as `$3`.
pub struct StandIn {
    pub scripts: TempDir,
    pub artifacts: TempDir,
    pub script: PathBuf,
}

impl StandIn {
    pub fn new(script: &str) -> Self {
        let scripts = tempfile::tempdir().unwrap();
        let artifacts = tempfile::tempdir().unwrap();
        let path = scripts.path().join("stand_in.sh");
        std::fs::write(&path, script).unwrap();
        Self {
            scripts,
            artifacts,
            script: path,
        }
    }

    pub fn db(&self) -> &str {
        self.script.to_str().unwrap()
    }

    pub fn config(&self) -> ProxyConfig {
        ProxyConfig {
            temp_path: self.artifacts.path().to_path_buf(),
            progress_binary: PathBuf::from("sh"),
            timeout: None,
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.config())
    }

    pub fn pipeline_with_timeout(&self, limit: Duration) -> Pipeline {
        Pipeline::new(ProxyConfig {
            timeout: Some(limit),
            ..self.config()
        })
    }

    pub fn leftover_artifacts(&self) -> Vec<PathBuf> {
        entries(self.artifacts.path())
    }
}

pub fn entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}
