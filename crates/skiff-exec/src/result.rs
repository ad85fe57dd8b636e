//! Result types for command execution

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Result of a remote command execution
///
/// Produced once the command channel has closed; the exit code captured at
/// that point is authoritative. A non-zero exit code is data, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    /// Exit status code (0 for success, -1 if the remote never reported one)
    pub exit_code: i32,
    /// stdout output
    pub stdout: String,
    /// stderr output
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
