//! End-to-end execution tests
//!
//! These need a reachable SSH server; configure it through
//! `SKIFF_TEST_HOST`, `SKIFF_TEST_USER` and `SKIFF_TEST_PASSWORD`, then run
//! with `cargo test -- --ignored`.

use skiff_exec::exec::{ExecOptions, run_command};
use skiff_exec::params::SshParams;
use skiff_exec::session::SshSession;

fn params_from_env() -> SshParams {
    SshParams {
        hostname: std::env::var("SKIFF_TEST_HOST").expect("SKIFF_TEST_HOST not set"),
        username: std::env::var("SKIFF_TEST_USER").expect("SKIFF_TEST_USER not set"),
        password: Some(std::env::var("SKIFF_TEST_PASSWORD").expect("SKIFF_TEST_PASSWORD not set")),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires SSH server"]
async fn echo_hello_returns_stdout_and_zero_exit() {
    let config = params_from_env().resolve().await.unwrap();
    let mut session = SshSession::open(&config).await.unwrap();

    let result = run_command(&mut session, "echo hello", ExecOptions::default())
        .await
        .unwrap();

    assert_eq!(result.stdout, "hello\n");
    assert!(result.stderr.is_empty());
    assert_eq!(result.exit_code, 0);
    assert!(!session.is_open());
}

#[tokio::test]
#[ignore = "requires SSH server"]
async fn nonzero_exit_is_data_not_error() {
    let config = params_from_env().resolve().await.unwrap();
    let mut session = SshSession::open(&config).await.unwrap();

    let result = run_command(&mut session, "false", ExecOptions::default())
        .await
        .unwrap();

    assert_eq!(result.exit_code, 1);
}

#[tokio::test]
#[ignore = "requires SSH server"]
async fn session_stays_open_when_requested() {
    let config = params_from_env().resolve().await.unwrap();
    let mut session = SshSession::open(&config).await.unwrap();

    let options = ExecOptions {
        end_connection_after: false,
    };
    run_command(&mut session, "true", options).await.unwrap();
    assert!(session.is_open());

    session.close().await.unwrap();
    // close is idempotent
    session.close().await.unwrap();
    assert!(!session.is_open());
}
