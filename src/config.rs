//! Process-start configuration.
//!
//! Both structs are built once in `main` and handed to the server by value.
//! Nothing here changes after the listener starts.

use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{DEFAULT_BIND_IP, DEFAULT_BIND_PORT, DEFAULT_PROGRESS_BINARY};

/// What every handling unit needs to store and run a query.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Directory that holds query artifacts while they run.
    pub temp_path: PathBuf,
    /// Interpreter binary. A bare name is looked up on `PATH`.
    pub progress_binary: PathBuf,
    /// Kill the interpreter after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            temp_path: std::env::temp_dir(),
            progress_binary: PathBuf::from(DEFAULT_PROGRESS_BINARY),
            timeout: None,
        }
    }
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    /// Worker threads. Each worker serves many requests concurrently.
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: DEFAULT_BIND_IP.to_string(),
            port: DEFAULT_BIND_PORT,
            workers: 1,
        }
    }
}

impl ServerConfig {
    /// `ip:port`, as handed to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
