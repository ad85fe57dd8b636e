//! SFTP client over a dedicated SSH session
//!
//! Owns both the underlying session and the sftp subsystem channel; a
//! transfer never shares its connection with command execution.

use std::path::Path;

use russh_sftp::client::SftpSession;
use russh_sftp::protocol::OpenFlags;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, instrument};

use skiff_exec::auth::ConnectionConfig;
use skiff_exec::error::ExecError;
use skiff_exec::session::SshSession;

use crate::error::TransferError;

pub struct SftpClient {
    session: SshSession,
    sftp: SftpSession,
}

impl SftpClient {
    /// Open a fresh connection and start the sftp subsystem on it
    #[instrument(skip(config), fields(host = %config.host))]
    pub async fn open(config: &ConnectionConfig) -> Result<Self, TransferError> {
        let mut session = SshSession::open(config).await?;

        let channel = match session.open_channel().await {
            Ok(channel) => channel,
            Err(e) => {
                session.close_quietly().await;
                return Err(e.into());
            }
        };

        if let Err(e) = channel.request_subsystem(true, "sftp").await {
            session.close_quietly().await;
            return Err(ExecError::Channel(e.to_string()).into());
        }

        let sftp = match SftpSession::new(channel.into_stream()).await {
            Ok(sftp) => sftp,
            Err(e) => {
                session.close_quietly().await;
                return Err(e.into());
            }
        };

        debug!(host = %session.host(), "sftp subsystem ready");
        Ok(Self { session, sftp })
    }

    /// The sftp session, for metadata lookups
    #[must_use]
    pub fn sftp(&self) -> &SftpSession {
        &self.sftp
    }

    /// Tear down the connection; the sftp channel goes with it
    pub async fn close(&mut self) {
        self.session.close_quietly().await;
    }

    /// Upload a single file to `remote_path`
    pub async fn upload_file(
        &self,
        local_path: &str,
        remote_path: &str,
    ) -> Result<(), TransferError> {
        let contents = tokio::fs::read(local_path).await?;

        let mut remote_file = self
            .sftp
            .open_with_flags(
                remote_path,
                OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
            )
            .await?;
        remote_file.write_all(&contents).await?;
        remote_file.flush().await?;
        remote_file.shutdown().await?;

        debug!(local = %local_path, remote = %remote_path, "uploaded file");
        Ok(())
    }

    /// Download a single file from `remote_path`
    pub async fn download_file(
        &self,
        remote_path: &str,
        local_path: &str,
    ) -> Result<(), TransferError> {
        let mut remote_file = self
            .sftp
            .open_with_flags(remote_path, OpenFlags::READ)
            .await?;

        let mut contents = Vec::new();
        remote_file.read_to_end(&mut contents).await?;

        let mut local_file = tokio::fs::File::create(local_path).await?;
        local_file.write_all(&contents).await?;
        local_file.flush().await?;

        debug!(remote = %remote_path, local = %local_path, "downloaded file");
        Ok(())
    }

    /// Upload a directory tree rooted at `local_dir` to `remote_dir`
    pub async fn upload_dir(
        &self,
        local_dir: &str,
        remote_dir: &str,
    ) -> Result<(), TransferError> {
        // Create the root; an already-existing directory is fine
        let _ = self.sftp.create_dir(remote_dir).await;
        self.upload_dir_recursive(Path::new(local_dir), remote_dir)
            .await
    }

    fn upload_dir_recursive<'a>(
        &'a self,
        local_dir: &'a Path,
        remote_dir: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<(), TransferError>> + Send + 'a>,
    > {
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(local_dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_name = entry.file_name();
                let file_name = file_name.to_string_lossy();
                let remote_path = format!("{}/{}", remote_dir.trim_end_matches('/'), file_name);

                let metadata = entry.metadata().await?;
                if metadata.is_dir() {
                    let _ = self.sftp.create_dir(&remote_path).await;
                    self.upload_dir_recursive(&path, &remote_path).await?;
                } else if metadata.is_file() {
                    self.upload_file(&path.to_string_lossy(), &remote_path)
                        .await?;
                }
            }

            Ok(())
        })
    }

    /// Download a directory tree rooted at `remote_dir` into `local_dir`
    pub async fn download_dir(
        &self,
        remote_dir: &str,
        local_dir: &str,
    ) -> Result<(), TransferError> {
        tokio::fs::create_dir_all(local_dir).await?;
        self.download_dir_recursive(remote_dir, Path::new(local_dir))
            .await
    }

    fn download_dir_recursive<'a>(
        &'a self,
        remote_dir: &'a str,
        local_dir: &'a Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<(), TransferError>> + Send + 'a>,
    > {
        Box::pin(async move {
            let entries = self.sftp.read_dir(remote_dir).await?;

            for entry in entries {
                let name = entry.file_name();
                if name == "." || name == ".." {
                    continue;
                }

                let remote_path = format!("{}/{}", remote_dir.trim_end_matches('/'), name);
                let local_path = local_dir.join(&name);
                let metadata = entry.metadata();

                if metadata.file_type().is_dir() {
                    tokio::fs::create_dir_all(&local_path).await?;
                    self.download_dir_recursive(&remote_path, &local_path)
                        .await?;
                } else if metadata.file_type().is_file() {
                    self.download_file(&remote_path, &local_path.to_string_lossy())
                        .await?;
                }
            }

            Ok(())
        })
    }
}
