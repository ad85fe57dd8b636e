//! Error types for skiff-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while connecting or executing remotely
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Invalid or missing credentials
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Private key path does not exist
    #[error("private key file not found: {0}")]
    KeyFileNotFound(String),

    /// Failed to connect to remote host
    #[error("connection failed: {0}")]
    Connect(String),

    /// No response within the connect timeout
    #[error("connection timed out after {timeout:?}")]
    ConnectTimeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Authentication rejected or key material unusable
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Command channel could not be established
    #[error("failed to open command channel: {0}")]
    Channel(String),

    /// Session already closed
    #[error("not connected")]
    NotConnected,

    /// I/O error during connection or execution
    #[error("I/O error: {0}")]
    Io(String),
}
