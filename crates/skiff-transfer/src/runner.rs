//! Upload and download operations
//!
//! Each operation opens its own connection, resolves the concrete destination
//! path, streams the data, and tears the connection down again. Transport
//! not-found errors are remapped to domain errors.

use russh_sftp::client::error::Error as SftpError;
use russh_sftp::protocol::{Status, StatusCode};
use tracing::{info, instrument};

use skiff_exec::auth::ConnectionConfig;

use crate::error::TransferError;
use crate::resolve::resolve_target_path;
use crate::sftp::SftpClient;
use crate::stat::{LocalStat, RemoteStat, StatPath};

/// Upload a single local file, resolving the remote destination
///
/// `alt_basename` overrides the source's own name when copying into a remote
/// directory (used for materialized secrets whose temp-file name is noise).
///
/// Returns the concrete remote path written.
#[instrument(skip(config), fields(host = %config.host))]
pub async fn upload_file(
    config: &ConnectionConfig,
    local_path: &str,
    remote_path: Option<&str>,
    alt_basename: Option<&str>,
) -> Result<String, TransferError> {
    let local_stat = LocalStat.stat(local_path).await?;
    if !local_stat.exists {
        return Err(TransferError::LocalPathNotFound(local_path.to_string()));
    }

    let mut client = SftpClient::open(config).await?;
    let result = upload_file_on(&client, local_path, remote_path, alt_basename).await;
    client.close().await;

    let resolved = result?;
    info!(local = %local_path, remote = %resolved, "file uploaded");
    Ok(resolved)
}

async fn upload_file_on(
    client: &SftpClient,
    local_path: &str,
    remote_path: Option<&str>,
    alt_basename: Option<&str>,
) -> Result<String, TransferError> {
    let resolved = resolve_target_path(
        local_path,
        remote_path,
        alt_basename,
        &RemoteStat::new(client.sftp()),
    )
    .await?;

    client
        .upload_file(local_path, &resolved)
        .await
        .map_err(|e| remap_remote_not_found(e, &resolved))?;
    Ok(resolved)
}

/// Upload a directory tree, resolving the remote destination
///
/// Returns the concrete remote path written.
#[instrument(skip(config), fields(host = %config.host))]
pub async fn upload_directory(
    config: &ConnectionConfig,
    local_path: &str,
    remote_path: Option<&str>,
) -> Result<String, TransferError> {
    let local_stat = LocalStat.stat(local_path).await?;
    if !local_stat.exists {
        return Err(TransferError::LocalPathNotFound(local_path.to_string()));
    }

    let mut client = SftpClient::open(config).await?;
    let result = upload_directory_on(&client, local_path, remote_path).await;
    client.close().await;

    let resolved = result?;
    info!(local = %local_path, remote = %resolved, "directory uploaded");
    Ok(resolved)
}

async fn upload_directory_on(
    client: &SftpClient,
    local_path: &str,
    remote_path: Option<&str>,
) -> Result<String, TransferError> {
    let resolved =
        resolve_target_path(local_path, remote_path, None, &RemoteStat::new(client.sftp()))
            .await?;

    client
        .upload_dir(local_path, &resolved)
        .await
        .map_err(|e| remap_remote_not_found(e, &resolved))?;
    Ok(resolved)
}

/// Download a remote file or directory tree, resolving the local destination
///
/// Fails with `RemotePathNotFound` when the remote source is absent, and with
/// `DestinationConflict` when a remote directory would land on an existing
/// local file; the conflict is detected before anything touches the local
/// filesystem.
///
/// Returns the concrete local path written.
#[instrument(skip(config), fields(host = %config.host))]
pub async fn download(
    config: &ConnectionConfig,
    remote_path: &str,
    local_path: Option<&str>,
) -> Result<String, TransferError> {
    let mut client = SftpClient::open(config).await?;
    let result = download_inner(&client, remote_path, local_path).await;
    client.close().await;

    let resolved = result?;
    info!(remote = %remote_path, local = %resolved, "download finished");
    Ok(resolved)
}

async fn download_inner(
    client: &SftpClient,
    remote_path: &str,
    local_path: Option<&str>,
) -> Result<String, TransferError> {
    let remote_attrs = client
        .sftp()
        .metadata(remote_path)
        .await
        .map_err(|e| remap_remote_not_found(e.into(), remote_path))?;

    let resolved = resolve_target_path(remote_path, local_path, None, &LocalStat).await?;

    if remote_attrs.is_dir() {
        if LocalStat.stat(&resolved).await?.is_existing_file() {
            return Err(TransferError::DestinationConflict(resolved));
        }
        client.download_dir(remote_path, &resolved).await?;
    } else {
        client.download_file(remote_path, &resolved).await?;
    }

    Ok(resolved)
}

/// Remap the transport's generic not-found to a domain error the caller can
/// act on
fn remap_remote_not_found(err: TransferError, remote_path: &str) -> TransferError {
    match err {
        TransferError::Sftp(SftpError::Status(Status {
            status_code: StatusCode::NoSuchFile,
            ..
        })) => TransferError::RemotePathNotFound(remote_path.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_stat_distinguishes_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("data.txt");
        tokio::fs::write(&file_path, b"x").await.unwrap();

        let dir_stat = LocalStat.stat(dir.path().to_str().unwrap()).await.unwrap();
        assert!(dir_stat.is_existing_dir());

        let file_stat = LocalStat.stat(file_path.to_str().unwrap()).await.unwrap();
        assert!(file_stat.is_existing_file());

        let missing = LocalStat
            .stat(dir.path().join("missing").to_str().unwrap())
            .await
            .unwrap();
        assert!(!missing.exists);
    }

    fn status_error(status_code: StatusCode) -> TransferError {
        TransferError::Sftp(SftpError::Status(Status {
            id: 0,
            status_code,
            error_message: String::new(),
            language_tag: String::new(),
        }))
    }

    #[test]
    fn not_found_status_is_remapped() {
        let err = remap_remote_not_found(status_error(StatusCode::NoSuchFile), "/srv/missing");
        assert!(matches!(err, TransferError::RemotePathNotFound(p) if p == "/srv/missing"));
    }

    #[test]
    fn other_sftp_errors_pass_through() {
        let err = remap_remote_not_found(status_error(StatusCode::PermissionDenied), "/srv/guarded");
        assert!(matches!(
            err,
            TransferError::Sftp(SftpError::Status(Status {
                status_code: StatusCode::PermissionDenied,
                ..
            }))
        ));
    }
}
