mod common;

use std::path::PathBuf;
use std::time::Duration;

use common::{ECHO_SCRIPT, StandIn};
use progress_proxy::config::ProxyConfig;
use progress_proxy::error::{ExecuteError, ProxyError};
use progress_proxy::pipeline::Pipeline;

#[tokio::test]
async fn run_returns_stdout_and_stderr() {
    let stand_in = StandIn::new(ECHO_SCRIPT);

    let result = stand_in
        .pipeline()
        .run(stand_in.db(), b"SELECT 1.")
        .await
        .unwrap();

    assert!(result.stdout.contains("SELECT 1."));
    assert_eq!(result.stderr, "fixed-stderr");
    assert!(stand_in.leftover_artifacts().is_empty());
}

#[tokio::test]
async fn child_sees_term_and_argument_order() {
    let stand_in = StandIn::new("printf '%s|%s|%s|%s' \"$1\" \"$2\" \"$TERM\" \"${3##*/}\"\n");

    let result = stand_in.pipeline().run(stand_in.db(), b"").await.unwrap();

    let fields: Vec<_> = result.stdout.split('|').collect();
    assert_eq!(&fields[..3], ["-b", "-p", "xterm"]);
    assert!(fields[3].starts_with("abl_"));
    assert!(fields[3].ends_with(".4gl"));
}

#[tokio::test]
async fn artifact_exists_while_interpreter_runs() {
    let stand_in = StandIn::new("test -f \"$3\" && echo present\n");

    let result = stand_in
        .pipeline()
        .run(stand_in.db(), b"DISPLAY 1.")
        .await
        .unwrap();

    assert_eq!(result.stdout.trim(), "present");
    assert!(stand_in.leftover_artifacts().is_empty());
}

#[tokio::test]
async fn nonzero_exit_is_not_an_error() {
    let stand_in = StandIn::new("echo partial\necho '** Unknown table' >&2\nexit 3\n");

    let result = stand_in
        .pipeline()
        .run(stand_in.db(), b"FIND FIRST nope.")
        .await
        .unwrap();

    assert_eq!(result.stdout.trim(), "partial");
    assert_eq!(result.stderr.trim(), "** Unknown table");
    assert!(stand_in.leftover_artifacts().is_empty());
}

#[tokio::test]
async fn large_output_on_both_streams_does_not_deadlock() {
    let stand_in = StandIn::new(
        "head -c 300000 /dev/zero | tr '\\0' a\nhead -c 300000 /dev/zero | tr '\\0' b >&2\n",
    );

    let result = tokio::time::timeout(
        Duration::from_secs(30),
        stand_in.pipeline().run(stand_in.db(), b""),
    )
    .await
    .expect("pipeline stalled")
    .unwrap();

    assert_eq!(result.stdout.len(), 300_000);
    assert_eq!(result.stderr.len(), 300_000);
    assert!(result.stdout.chars().all(|c| c == 'a'));
    assert!(result.stderr.chars().all(|c| c == 'b'));
}

#[tokio::test]
async fn invalid_utf8_is_replaced() {
    let stand_in = StandIn::new("printf 'ok\\377'\n");

    let result = stand_in.pipeline().run(stand_in.db(), b"").await.unwrap();

    assert_eq!(result.stdout, "ok\u{FFFD}");
}

#[tokio::test]
async fn spawn_failure_releases_artifact() {
    let artifacts = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(ProxyConfig {
        temp_path: artifacts.path().to_path_buf(),
        progress_binary: PathBuf::from("/nonexistent/bin/_progres"),
        timeout: None,
    });

    let err = pipeline.run("sports", b"DISPLAY 1.").await.unwrap_err();

    assert!(matches!(err, ProxyError::Execute(ExecuteError::Spawn { .. })));
    assert!(common::entries(artifacts.path()).is_empty());
}

#[tokio::test]
async fn unwritable_store_fails_before_spawning() {
    let stand_in = StandIn::new("touch \"${0%/*}/spawned\"\n");
    let pipeline = Pipeline::new(ProxyConfig {
        temp_path: stand_in.artifacts.path().join("missing"),
        ..stand_in.config()
    });

    let err = pipeline.run(stand_in.db(), b"DISPLAY 1.").await.unwrap_err();

    assert!(matches!(err, ProxyError::Store(_)));
    assert!(!stand_in.scripts.path().join("spawned").exists());
}

#[tokio::test]
async fn timeout_kills_interpreter_and_releases_artifact() {
    let stand_in = StandIn::new("exec sleep 30\n");
    let pipeline = stand_in.pipeline_with_timeout(Duration::from_millis(200));

    let started = std::time::Instant::now();
    let err = pipeline.run(stand_in.db(), b"PAUSE.").await.unwrap_err();

    assert!(matches!(
        err,
        ProxyError::Execute(ExecuteError::TimedOut(limit)) if limit == Duration::from_millis(200)
    ));
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(stand_in.leftover_artifacts().is_empty());
}

#[tokio::test]
async fn fast_interpreter_beats_timeout() {
    let stand_in = StandIn::new(ECHO_SCRIPT);
    let pipeline = stand_in.pipeline_with_timeout(Duration::from_secs(30));

    let result = pipeline.run(stand_in.db(), b"SELECT 1.").await.unwrap();

    assert_eq!(result.stdout, "SELECT 1.");
}
