//! Destination path resolution
//!
//! Decides whether a copy target is a directory to copy *into* or the exact
//! destination name, following conventional `cp`/`scp` semantics. The same
//! algorithm runs against the remote filesystem for uploads and the local
//! filesystem for downloads, via the injected [`StatPath`] capability.

use tracing::debug;

use crate::error::TransferError;
use crate::stat::StatPath;

/// Compute the concrete destination path for a copy
///
/// Starts from `target_path`, or `"./"` if absent. If that candidate exists
/// and is a directory, the result is the candidate joined with
/// `alt_basename` (when the source's own name is not meaningful, e.g. for
/// materialized secrets) or the source's basename. Otherwise the candidate
/// itself is the destination.
pub async fn resolve_target_path(
    source_path: &str,
    target_path: Option<&str>,
    alt_basename: Option<&str>,
    stat: &dyn StatPath,
) -> Result<String, TransferError> {
    let candidate = match target_path {
        Some(t) if !t.is_empty() => t,
        _ => "./",
    };

    let candidate_stat = stat.stat(candidate).await?;
    let resolved = if candidate_stat.is_existing_dir() {
        let name = alt_basename.unwrap_or_else(|| basename(source_path));
        join(candidate, name)
    } else {
        candidate.to_string()
    };

    debug!(source = %source_path, target = %resolved, "resolved copy destination");
    Ok(resolved)
}

/// Final component of a `/`-separated path, ignoring a trailing slash
fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// String-level join; the remote side is POSIX SFTP so `/` applies to both
fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
