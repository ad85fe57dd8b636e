//! Error types for skiff-transfer

use thiserror::Error;

use skiff_exec::error::ExecError;

/// Errors that can occur during a copy operation
#[derive(Error, Debug)]
pub enum TransferError {
    /// Local source path does not exist
    #[error("local path not found: {0}")]
    LocalPathNotFound(String),

    /// Remote path missing; remapped from the transport's generic not-found
    #[error("remote path not found: {0}. Must be an existing path on the remote system")]
    RemotePathNotFound(String),

    /// Directory download would overwrite an existing local file
    #[error(
        "can't save directory to {0} because it's a file; delete the file first or change the local path"
    )]
    DestinationConflict(String),

    /// Connection or authentication failure
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// SFTP protocol error
    #[error("SFTP error: {0}")]
    Sftp(#[from] russh_sftp::client::error::Error),

    /// Local I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
