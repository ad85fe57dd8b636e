//! Command output policy
//!
//! One explicit policy for turning a [`CommandResult`] into a caller-facing
//! outcome. Default behavior: the exit code is data, stderr with no stdout is
//! an error, and stderr alongside stdout is surfaced as a warning while
//! stdout remains the result. With `strict` set, any non-zero exit code is an
//! error as well.

use eyre::{Result, bail};
use tracing::warn;

use skiff_exec::result::CommandResult;

pub fn handle_command_output(result: CommandResult, strict: bool) -> Result<String> {
    if strict && !result.success() {
        bail!(
            "command exited with code {}\nstdout:\n{}\nstderr:\n{}",
            result.exit_code,
            result.stdout,
            result.stderr
        );
    }

    if !result.stderr.is_empty() && result.stdout.is_empty() {
        bail!("{}", result.stderr);
    }

    if !result.stderr.is_empty() {
        warn!(stderr = %result.stderr, "command wrote to stderr");
    }

    Ok(result.stdout)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn result(exit_code: i32, stdout: &str, stderr: &str) -> CommandResult {
        CommandResult {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn clean_run_returns_stdout() {
        let out = handle_command_output(result(0, "hello\n", ""), false).unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn stderr_without_stdout_is_an_error() {
        let err = handle_command_output(result(0, "", "boom\n"), false).unwrap_err();
        assert_eq!(err.to_string(), "boom\n");
    }

    #[test]
    fn stderr_with_stdout_is_noise_not_failure() {
        let out = handle_command_output(result(0, "partial\n", "warning: x\n"), false).unwrap();
        assert_eq!(out, "partial\n");
    }

    #[test]
    fn nonzero_exit_is_data_by_default() {
        let out = handle_command_output(result(3, "tried\n", ""), false).unwrap();
        assert_eq!(out, "tried\n");
    }

    #[test]
    fn strict_mode_fails_nonzero_exit() {
        let err = handle_command_output(result(3, "tried\n", ""), true).unwrap_err();
        assert!(err.to_string().contains("exited with code 3"));
    }
}
