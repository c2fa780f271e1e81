#![cfg(unix)]

use std::path::Path;

use assert_matches::assert_matches;
use stkr_cli::{
    publish::{CommandRunner, ProcessRunner},
    CliError,
};

#[tokio::test]
async fn test_successful_process() {
    let result = ProcessRunner
        .run(Path::new("/bin/sh"), &["-c".to_string(), "exit 0".to_string()])
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_failing_process() {
    let err = ProcessRunner
        .run(Path::new("/bin/sh"), &["-c".to_string(), "exit 3".to_string()])
        .await
        .unwrap_err();
    assert_matches!(err.current_context(), CliError::Runtime);
}

#[tokio::test]
async fn test_missing_program() {
    let dir = tempfile::tempdir().unwrap();
    let err = ProcessRunner
        .run(&dir.path().join("forge"), &[])
        .await
        .unwrap_err();
    assert_matches!(err.current_context(), CliError::Runtime);
}
