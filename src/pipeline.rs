//! Runs stored queries through the interpreter.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ProxyConfig;
use crate::consts::{BATCH_FLAG, INTERPRETER_TERM, PROCEDURE_FLAG};
use crate::error::{ExecuteError, ProxyError};
use crate::store::{QueryArtifact, QueryStore};

/// Captured output of one interpreter run. Invalid UTF-8 is replaced, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
}

/// Store → spawn → drain → wait → release, for one request at a time.
///
/// Holds only immutable configuration, so one instance is shared by every
/// handling unit.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ProxyConfig,
    store: QueryStore,
}

impl Pipeline {
    pub fn new(config: ProxyConfig) -> Self {
        let store = QueryStore::new(config.temp_path.clone());
        Self { config, store }
    }

    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    /// Store `body` and execute it against `db`.
    pub async fn run(&self, db: &str, body: &[u8]) -> Result<ExecutionResult, ProxyError> {
        let artifact = self.store.store(body).await?;
        Ok(self.execute(db, artifact).await?)
    }

    /// Execute a stored query against `db`, then release it.
    ///
    /// The artifact is released exactly once whatever happens. A nonzero
    /// exit status still yields the captured streams; only failing to
    /// start, read or wait for the interpreter is an error.
    pub async fn execute(
        &self,
        db: &str,
        artifact: QueryArtifact,
    ) -> Result<ExecutionResult, ExecuteError> {
        let outcome = self.invoke(db, artifact.path()).await;
        artifact.release().await;
        outcome
    }

    /// Interpreter invocation: `<binary> <db> -b -p <file>`, with TERM set
    /// on the child only.
    pub fn command(&self, db: &str, file: &Path) -> Command {
        let mut cmd = Command::new(&self.config.progress_binary);
        cmd.arg(db)
            .arg(BATCH_FLAG)
            .arg(PROCEDURE_FLAG)
            .arg(file)
            .env("TERM", INTERPRETER_TERM)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn invoke(&self, db: &str, file: &Path) -> Result<ExecutionResult, ExecuteError> {
        let mut child = self
            .command(db, file)
            .spawn()
            .map_err(|source| ExecuteError::Spawn {
                binary: self.config.progress_binary.clone(),
                source,
            })?;
        debug!(db, file = %file.display(), pid = child.id(), "spawned interpreter");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain both pipes alongside wait(). A child blocked on a full
        // pipe never exits, so none of these may wait on another.
        let finished = async {
            tokio::try_join!(drain(stdout), drain(stderr), child.wait())
        };

        let (stdout, stderr, status) = match self.config.timeout {
            None => finished.await?,
            Some(limit) => match tokio::time::timeout(limit, finished).await {
                Ok(result) => result?,
                Err(_) => {
                    // kill() also reaps, so no zombie is left behind.
                    let _ = child.kill().await;
                    return Err(ExecuteError::TimedOut(limit));
                }
            },
        };

        log_exit(db, status, stdout.len(), stderr.len());

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn log_exit(db: &str, status: ExitStatus, stdout_len: usize, stderr_len: usize) {
    match status.code() {
        Some(0) => debug!(db, stdout_len, stderr_len, "interpreter finished"),
        Some(code) => info!(db, code, stdout_len, stderr_len, "interpreter exited nonzero"),
        None => info!(db, stdout_len, stderr_len, "interpreter killed by signal"),
    }
}
