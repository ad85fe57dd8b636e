//! End-to-end transfer tests
//!
//! These need a reachable SSH server with SFTP enabled; configure it through
//! `SKIFF_TEST_HOST`, `SKIFF_TEST_USER` and `SKIFF_TEST_PASSWORD`, then run
//! with `cargo test -- --ignored`. The remote account needs a writable home
//! directory.

use skiff_exec::auth::ConnectionConfig;
use skiff_exec::params::SshParams;
use skiff_transfer::error::TransferError;
use skiff_transfer::runner::{download, upload_directory, upload_file};

async fn config_from_env() -> ConnectionConfig {
    SshParams {
        hostname: std::env::var("SKIFF_TEST_HOST").expect("SKIFF_TEST_HOST not set"),
        username: std::env::var("SKIFF_TEST_USER").expect("SKIFF_TEST_USER not set"),
        password: Some(std::env::var("SKIFF_TEST_PASSWORD").expect("SKIFF_TEST_PASSWORD not set")),
        ..Default::default()
    }
    .resolve()
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires SSH server"]
async fn upload_into_remote_directory_keeps_basename() {
    let config = config_from_env().await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("report.txt");
    tokio::fs::write(&local, b"quarterly numbers\n").await.unwrap();

    // "." is the remote home directory, which exists, so the source basename
    // is appended
    let resolved = upload_file(&config, local.to_str().unwrap(), Some("."), None)
        .await
        .unwrap();
    assert_eq!(resolved, "./report.txt");

    // round-trip to verify the bytes survived
    let back = dir.path().join("back.txt");
    download(&config, "./report.txt", Some(back.to_str().unwrap()))
        .await
        .unwrap();
    assert_eq!(
        tokio::fs::read(&back).await.unwrap(),
        b"quarterly numbers\n"
    );
}

#[tokio::test]
#[ignore = "requires SSH server"]
async fn upload_missing_local_path_fails_before_connecting() {
    let config = config_from_env().await;
    let err = upload_file(&config, "/nonexistent/report.txt", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::LocalPathNotFound(_)));
}

#[tokio::test]
#[ignore = "requires SSH server"]
async fn download_of_missing_remote_path_is_domain_error() {
    let config = config_from_env().await;
    let err = download(&config, "/definitely/not/there", None)
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::RemotePathNotFound(_)));
}

#[tokio::test]
#[ignore = "requires SSH server"]
async fn directory_tree_round_trips() {
    let config = config_from_env().await;

    let src = tempfile::tempdir().unwrap();
    tokio::fs::create_dir(src.path().join("nested")).await.unwrap();
    tokio::fs::write(src.path().join("a.txt"), b"alpha").await.unwrap();
    tokio::fs::write(src.path().join("nested/b.txt"), b"beta").await.unwrap();

    let remote = upload_directory(&config, src.path().to_str().unwrap(), Some("skiff-test-tree"))
        .await
        .unwrap();

    let dst = tempfile::tempdir().unwrap();
    let local = download(&config, &remote, Some(dst.path().to_str().unwrap()))
        .await
        .unwrap();

    let root = std::path::Path::new(&local);
    assert_eq!(tokio::fs::read(root.join("a.txt")).await.unwrap(), b"alpha");
    assert_eq!(
        tokio::fs::read(root.join("nested/b.txt")).await.unwrap(),
        b"beta"
    );
}

#[tokio::test]
#[ignore = "requires SSH server"]
async fn remote_directory_onto_local_file_is_a_conflict() {
    let config = config_from_env().await;

    let src = tempfile::tempdir().unwrap();
    tokio::fs::write(src.path().join("a.txt"), b"alpha").await.unwrap();
    let remote = upload_directory(&config, src.path().to_str().unwrap(), Some("skiff-test-conflict"))
        .await
        .unwrap();

    let dst = tempfile::tempdir().unwrap();
    let blocker = dst.path().join("blocker");
    tokio::fs::write(&blocker, b"do not overwrite").await.unwrap();

    let err = download(&config, &remote, Some(blocker.to_str().unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::DestinationConflict(_)));
    // the blocking file is untouched
    assert_eq!(
        tokio::fs::read(&blocker).await.unwrap(),
        b"do not overwrite"
    );
}
