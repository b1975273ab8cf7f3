//! Project-wide constants.

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Interpreter invoked when `--progress-binary` is not given. Resolved via `PATH`.
pub const DEFAULT_PROGRESS_BINARY: &str = "_progres";

pub const DEFAULT_BIND_IP: &str = "0.0.0.0";
pub const DEFAULT_BIND_PORT: u16 = 8080;

/// Prefix of every query artifact file name.
pub const ARTIFACT_PREFIX: &str = "abl_";

/// Extension marking an artifact as interpreter source.
pub const ARTIFACT_EXTENSION: &str = "4gl";

/// Terminal type the interpreter sees. It misbehaves when TERM is unset.
pub const INTERPRETER_TERM: &str = "xterm";

/// Runs the interpreter without its interactive UI.
pub const BATCH_FLAG: &str = "-b";

/// Introduces the procedure file to execute.
pub const PROCEDURE_FLAG: &str = "-p";

/// Route prefix served by the proxy.
pub const QUERY_PATH: &str = "/progress/query/";
