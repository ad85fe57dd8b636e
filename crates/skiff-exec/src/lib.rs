//! skiff-exec: SSH connection and remote command execution
//!
//! Resolves caller-supplied credentials into a connection descriptor, owns the
//! authenticated transport session, and runs single commands with captured
//! stdout/stderr and exit status.

pub mod auth;
pub mod error;
pub mod exec;
pub mod params;
pub mod result;
pub mod session;
