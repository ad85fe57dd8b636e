//! Remote command execution over an open session

use std::time::Instant;

use russh::ChannelMsg;
use tracing::{debug, instrument};

use crate::error::ExecError;
use crate::result::CommandResult;
use crate::session::SshSession;

/// Options for a single command execution
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Close the session once the command channel closes
    pub end_connection_after: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            end_connection_after: true,
        }
    }
}

/// Execute one command on the session and capture its output
///
/// Opens exactly one channel, appends stdout and stderr chunks to independent
/// buffers as they arrive, and resolves when the channel stream ends. Output
/// can trail the exit-status message, so the loop runs until the stream ends
/// rather than stopping at EOF. The exit code recorded by then is
/// authoritative; a non-zero code is returned as data, not as an error.
///
/// # Errors
/// `ExecError::Channel` if the channel could not be opened or the command
/// could not be issued. The session is still torn down on that path when
/// `end_connection_after` is set.
#[instrument(skip(session, command), fields(host = %session.host()))]
pub async fn run_command(
    session: &mut SshSession,
    command: &str,
    options: ExecOptions,
) -> Result<CommandResult, ExecError> {
    debug!(command = %command, "executing remote command");

    let start = Instant::now();

    let result = exec_on_channel(session, command).await;

    if options.end_connection_after {
        session.close_quietly().await;
    }

    let (exit_code, stdout, stderr) = result?;
    let duration = start.elapsed();

    debug!(
        command = %command,
        exit_code = exit_code,
        duration = ?duration,
        "remote command completed"
    );

    Ok(CommandResult {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout).to_string(),
        stderr: String::from_utf8_lossy(&stderr).to_string(),
        duration,
    })
}

async fn exec_on_channel(
    session: &mut SshSession,
    command: &str,
) -> Result<(i32, Vec<u8>, Vec<u8>), ExecError> {
    let mut channel = session.open_channel().await?;

    channel
        .exec(true, command)
        .await
        .map_err(|e| ExecError::Channel(e.to_string()))?;

    let mut exit_code = -1;
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    // Stream end means the channel closed; do not stop at Eof, the exit
    // status and trailing output may still be in flight
    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { data } => {
                stdout.extend_from_slice(&data);
            }
            ChannelMsg::ExtendedData { data, ext } if ext == 1 => {
                stderr.extend_from_slice(&data);
            }
            ChannelMsg::ExitStatus { exit_status } => {
                exit_code = exit_status.cast_signed();
            }
            _ => {}
        }
    }

    Ok((exit_code, stdout, stderr))
}
