//! Path metadata capability
//!
//! One small trait reporting existence and directory-ness of a path, with a
//! local-filesystem and a remote-via-SFTP implementation, so the same
//! destination-resolution algorithm serves uploads and downloads.

use async_trait::async_trait;
use russh_sftp::client::SftpSession;

use crate::error::TransferError;

/// Existence and kind of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStat {
    pub exists: bool,
    pub is_dir: bool,
}

impl PathStat {
    pub const ABSENT: PathStat = PathStat {
        exists: false,
        is_dir: false,
    };

    #[must_use]
    pub fn is_existing_dir(self) -> bool {
        self.exists && self.is_dir
    }

    #[must_use]
    pub fn is_existing_file(self) -> bool {
        self.exists && !self.is_dir
    }
}

/// Capability to stat a path on some filesystem
#[async_trait]
pub trait StatPath: Send + Sync {
    /// Report existence and directory-ness of `path`
    async fn stat(&self, path: &str) -> Result<PathStat, TransferError>;
}

/// Stat against the local filesystem
pub struct LocalStat;

#[async_trait]
impl StatPath for LocalStat {
    async fn stat(&self, path: &str) -> Result<PathStat, TransferError> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(PathStat {
                exists: true,
                is_dir: meta.is_dir(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PathStat::ABSENT),
            Err(e) => Err(TransferError::Io(e)),
        }
    }
}

/// Stat against the remote filesystem through an open SFTP session
pub struct RemoteStat<'a> {
    sftp: &'a SftpSession,
}

impl<'a> RemoteStat<'a> {
    pub fn new(sftp: &'a SftpSession) -> Self {
        Self { sftp }
    }
}

#[async_trait]
impl StatPath for RemoteStat<'_> {
    async fn stat(&self, path: &str) -> Result<PathStat, TransferError> {
        // Any stat failure counts as absent; the server reports not-found in
        // slightly different shapes depending on the path
        match self.sftp.metadata(path).await {
            Ok(attrs) => Ok(PathStat {
                exists: true,
                is_dir: attrs.is_dir(),
            }),
            Err(_) => Ok(PathStat::ABSENT),
        }
    }
}
