//! skiff-transfer: secure copy to and from a remote host
//!
//! Resolves ambiguous copy destinations the way a conventional `cp`/`scp`
//! would and streams files or directory trees over SFTP. Every transfer opens
//! and closes its own connection.

pub mod error;
pub mod resolve;
pub mod runner;
pub mod sftp;
pub mod stat;
