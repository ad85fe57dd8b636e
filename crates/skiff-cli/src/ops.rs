//! Operation entry points
//!
//! The calling layer the plugin bootstrap invokes: each entry resolves
//! credentials, performs exactly one operation over its own connection, and
//! returns either plain output or a receipt with the resolved path.

use eyre::Result;
use serde::Serialize;

use skiff_exec::exec::{ExecOptions, run_command};
use skiff_exec::params::SshParams;
use skiff_exec::session::SshSession;
use skiff_transfer::runner;
use skiff_transfer::stat::{LocalStat, StatPath};

use crate::output::handle_command_output;
use crate::vault::SecretFile;

/// Receipt for a copy toward the remote host
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCopyReceipt {
    pub remote_path: String,
}

/// Receipt for a copy toward the local filesystem
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCopyReceipt {
    pub local_path: String,
}

/// Run one command on the remote host and apply the output policy
pub async fn execute_command(params: &SshParams, command: &str, strict: bool) -> Result<String> {
    let config = params.resolve().await?;
    let mut session = SshSession::open(&config).await?;
    let result = run_command(&mut session, command, ExecOptions::default()).await?;
    handle_command_output(result, strict)
}

/// Copy a local file or directory tree onto the remote host
pub async fn secure_copy_to_remote_host(
    params: &SshParams,
    local_path: &str,
    remote_path: Option<&str>,
) -> Result<RemoteCopyReceipt> {
    let config = params.resolve().await?;
    let absolute = std::path::absolute(local_path)?;
    let absolute = absolute.to_string_lossy();

    // A missing source falls through to upload_file, which reports it
    let sent_to = if LocalStat.stat(&absolute).await?.is_existing_dir() {
        runner::upload_directory(&config, &absolute, remote_path).await?
    } else {
        runner::upload_file(&config, &absolute, remote_path, None).await?
    };

    Ok(RemoteCopyReceipt {
        remote_path: sent_to,
    })
}

/// Copy a remote file or directory tree to the local filesystem
pub async fn secure_copy_from_remote_host(
    params: &SshParams,
    remote_path: &str,
    local_path: Option<&str>,
) -> Result<LocalCopyReceipt> {
    let config = params.resolve().await?;
    let absolute = std::path::absolute(local_path.unwrap_or("."))?;

    let saved_to = runner::download(&config, remote_path, Some(&absolute.to_string_lossy())).await?;

    Ok(LocalCopyReceipt {
        local_path: saved_to,
    })
}

/// Upload secret content as a file on the remote host
///
/// The secret exists on the local disk only for the duration of the upload.
pub async fn secure_copy_from_vault_to_remote_host(
    params: &SshParams,
    vault_item: &str,
    remote_path: Option<&str>,
) -> Result<RemoteCopyReceipt> {
    let config = params.resolve().await?;
    let secret = SecretFile::materialize(vault_item)?;

    let sent_to = runner::upload_file(
        &config,
        &secret.path().to_string_lossy(),
        remote_path,
        Some(secret.basename()),
    )
    .await?;

    Ok(RemoteCopyReceipt {
        remote_path: sent_to,
    })
}
